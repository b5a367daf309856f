//! Audio sink
//!
//! The game only ever fires named sound triggers and never waits on them.
//! On the web the effects are synthesized with Web Audio oscillators, no
//! sample files needed. Everywhere else (and when the browser refuses an
//! AudioContext) sounds are silently dropped.

use crate::sim::{EnemyKind, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fires
    Shoot,
    /// Shooter or boss fires
    EnemyShoot,
    /// Enemy damaged but alive
    Hit,
    /// Regular enemy destroyed
    Explosion,
    /// Boss destroyed
    BossExplosion,
    /// Snake segment destroyed
    SegmentPop,
    /// Player lost a life
    PlayerHit,
    /// Shield absorbed a hit
    ShieldBlock,
    /// Power-up collected
    PowerUp,
    /// Bomb detonated
    Bomb,
    /// Player bullet hit the arena wall
    BorderHit,
    /// New wave
    WaveStart,
    /// Boss wave warning
    BossWarning,
    /// Wave cleared
    WaveClear,
    /// Secret cache found
    SecretCache,
    GameOver,
    HighScore,
}

/// Something that can play sound effects
pub trait AudioSink {
    /// Fire-and-forget
    fn play(&mut self, effect: SoundEffect);

    /// Apply volume settings (0.0 - 1.0)
    fn set_volume(&mut self, _master: f32, _sfx: f32, _muted: bool) {}
}

/// Drops every sound
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Sound to play for a game event, if any
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    let effect = match event {
        GameEvent::PlayerShot => SoundEffect::Shoot,
        GameEvent::EnemyShot => SoundEffect::EnemyShoot,
        GameEvent::EnemyHit { .. } => SoundEffect::Hit,
        GameEvent::EnemyKilled {
            kind: EnemyKind::BossHexagon,
            ..
        } => SoundEffect::BossExplosion,
        GameEvent::EnemyKilled { .. } => SoundEffect::Explosion,
        GameEvent::SegmentDestroyed { .. } => SoundEffect::SegmentPop,
        GameEvent::PlayerHit { .. } => SoundEffect::PlayerHit,
        GameEvent::ShieldBlocked { .. } => SoundEffect::ShieldBlock,
        GameEvent::PowerUpCollected { .. } => SoundEffect::PowerUp,
        GameEvent::BombDetonated { .. } => SoundEffect::Bomb,
        GameEvent::BulletHitBorder { hostile: false, .. } => SoundEffect::BorderHit,
        GameEvent::BulletHitBorder { hostile: true, .. } => return None,
        GameEvent::WaveStarted { boss: true, .. } => SoundEffect::BossWarning,
        GameEvent::WaveStarted { .. } => SoundEffect::WaveStart,
        GameEvent::WaveCleared { .. } => SoundEffect::WaveClear,
        GameEvent::SecretCache { .. } => SoundEffect::SecretCache,
        GameEvent::GameOver { .. } => SoundEffect::GameOver,
        GameEvent::PowerUpDropped { .. } => return None,
    };
    Some(effect)
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Web Audio oscillator synth
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    /// One oscillator voice: start/end frequency, gain, duration
    struct Voice {
        osc_type: OscillatorType,
        from_hz: f32,
        to_hz: f32,
        gain: f32,
        duration: f64,
        delay: f64,
    }

    impl Voice {
        const fn new(osc_type: OscillatorType, from_hz: f32, to_hz: f32, gain: f32, duration: f64) -> Self {
            Self {
                osc_type,
                from_hz,
                to_hz,
                gain,
                duration,
                delay: 0.0,
            }
        }

        const fn after(mut self, delay: f64) -> Self {
            self.delay = delay;
            self
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Not available outside secure contexts
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn voice(ctx: &AudioContext, vol: f32, voice: Voice) {
            let Some((osc, gain)) = Self::create_osc(ctx, voice.from_hz, voice.osc_type) else {
                return;
            };
            let t = ctx.current_time() + voice.delay;
            let end = t + voice.duration;

            gain.gain().set_value_at_time(vol * voice.gain, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            osc.frequency().set_value_at_time(voice.from_hz, t).ok();
            if voice.to_hz != voice.from_hz {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(voice.to_hz, end)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.02).ok();
        }

        fn voices(effect: SoundEffect) -> Vec<Voice> {
            use OscillatorType::{Sawtooth, Sine, Square, Triangle};
            match effect {
                SoundEffect::Shoot => vec![Voice::new(Square, 880.0, 440.0, 0.08, 0.06)],
                SoundEffect::EnemyShoot => vec![Voice::new(Sawtooth, 300.0, 180.0, 0.1, 0.1)],
                SoundEffect::Hit => vec![Voice::new(Triangle, 300.0, 300.0, 0.25, 0.05)],
                SoundEffect::Explosion => vec![
                    Voice::new(Sawtooth, 200.0, 40.0, 0.35, 0.25),
                    Voice::new(Square, 90.0, 30.0, 0.2, 0.3),
                ],
                SoundEffect::BossExplosion => vec![
                    Voice::new(Sawtooth, 160.0, 20.0, 0.5, 1.2),
                    Voice::new(Square, 60.0, 20.0, 0.4, 1.4),
                    Voice::new(Sine, 900.0, 100.0, 0.2, 0.8).after(0.15),
                ],
                SoundEffect::SegmentPop => vec![Voice::new(Sine, 700.0, 350.0, 0.2, 0.07)],
                SoundEffect::PlayerHit => vec![
                    Voice::new(Sawtooth, 400.0, 50.0, 0.5, 0.6),
                    Voice::new(Sine, 80.0, 30.0, 0.4, 0.6),
                ],
                SoundEffect::ShieldBlock => vec![Voice::new(Triangle, 1200.0, 600.0, 0.25, 0.12)],
                SoundEffect::PowerUp => vec![
                    Voice::new(Sine, 523.0, 523.0, 0.25, 0.08),
                    Voice::new(Sine, 659.0, 659.0, 0.25, 0.08).after(0.08),
                    Voice::new(Sine, 784.0, 784.0, 0.25, 0.12).after(0.16),
                ],
                SoundEffect::Bomb => vec![
                    Voice::new(Sawtooth, 120.0, 20.0, 0.6, 1.0),
                    Voice::new(Sine, 50.0, 25.0, 0.5, 1.2),
                ],
                SoundEffect::BorderHit => vec![Voice::new(Sine, 400.0, 400.0, 0.1, 0.05)],
                SoundEffect::WaveStart => vec![Voice::new(Triangle, 330.0, 660.0, 0.25, 0.3)],
                SoundEffect::BossWarning => vec![
                    Voice::new(Square, 110.0, 110.0, 0.3, 0.4),
                    Voice::new(Square, 110.0, 110.0, 0.3, 0.4).after(0.5),
                    Voice::new(Square, 82.0, 82.0, 0.3, 0.6).after(1.0),
                ],
                SoundEffect::WaveClear => vec![
                    Voice::new(Sine, 523.0, 523.0, 0.3, 0.15),
                    Voice::new(Sine, 784.0, 784.0, 0.3, 0.15).after(0.12),
                    Voice::new(Sine, 1047.0, 1047.0, 0.3, 0.3).after(0.24),
                ],
                SoundEffect::SecretCache => vec![
                    Voice::new(Triangle, 1047.0, 2093.0, 0.3, 0.4),
                    Voice::new(Sine, 1568.0, 1568.0, 0.2, 0.3).after(0.2),
                ],
                SoundEffect::GameOver => vec![
                    Voice::new(Sawtooth, 440.0, 220.0, 0.3, 0.4),
                    Voice::new(Sawtooth, 330.0, 165.0, 0.3, 0.4).after(0.4),
                    Voice::new(Sawtooth, 220.0, 55.0, 0.3, 0.9).after(0.8),
                ],
                SoundEffect::HighScore => vec![
                    Voice::new(Square, 523.0, 523.0, 0.2, 0.12),
                    Voice::new(Square, 659.0, 659.0, 0.2, 0.12).after(0.12),
                    Voice::new(Square, 784.0, 784.0, 0.2, 0.12).after(0.24),
                    Voice::new(Square, 1047.0, 1047.0, 0.25, 0.4).after(0.36),
                ],
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for voice in Self::voices(effect) {
                Self::voice(ctx, vol, voice);
            }
        }

        fn set_volume(&mut self, master: f32, sfx: f32, muted: bool) {
            self.master_volume = master.clamp(0.0, 1.0);
            self.sfx_volume = sfx.clamp(0.0, 1.0);
            self.muted = muted;
        }
    }
}
