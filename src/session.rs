//! Host-facing session driver
//!
//! Owns the game state and its collaborators. The host forwards raw input
//! into `input`, calls `frame(dt)` once per display refresh and draws with
//! `render`. Screen transitions (menu, options, pause, game over) are driven
//! here from key edges; gameplay runs through `sim::tick`.

use glam::Vec2;

use crate::audio::{AudioSink, NullAudio, SoundEffect, sound_for};
use crate::camera::Camera;
use crate::consts::MAX_FRAME_DT;
use crate::input::{InputState, Key};
use crate::persistence::SaveStore;
use crate::platform;
use crate::render::{Renderer, render_state};
use crate::settings::Settings;
use crate::sim::{EnemyKind, GameEvent, GamePhase, GameState, autopilot_input, tick};

/// Shake amplitudes (pixels)
const SHAKE_PLAYER_HIT: f32 = 12.0;
const SHAKE_BOMB: f32 = 16.0;
const SHAKE_BOSS_KILL: f32 = 20.0;

pub struct Session {
    pub state: GameState,
    pub input: InputState,
    pub camera: Camera,
    audio: Box<dyn AudioSink>,
    store: SaveStore,
    settings: Settings,
    /// Autopilot plays instead of the input
    pub demo: bool,
    /// Enemy type placed by secondary clicks during play
    pub debug_spawn: Option<EnemyKind>,
    /// Score and kills already written to the stats
    banked_score: u64,
    banked_kills: u64,
    /// Set when the last game over beat the stored high score
    pub new_high_score: bool,
}

impl Session {
    pub fn new(seed: u64, viewport: Vec2, audio: Box<dyn AudioSink>, store: SaveStore) -> Self {
        let settings = store.settings().clone();
        let mut state = GameState::new(seed);
        state.control_mode = settings.control_mode;
        let camera = Camera::new(viewport, state.arena);

        let mut session = Self {
            state,
            input: InputState::new(),
            camera,
            audio,
            store,
            settings,
            demo: false,
            debug_spawn: None,
            banked_score: 0,
            banked_kills: 0,
            new_high_score: false,
        };
        session.apply_audio_settings();
        session
    }

    /// Silent, memory-backed session
    pub fn headless(seed: u64) -> Self {
        Self::new(
            seed,
            Vec2::new(1280.0, 720.0),
            Box::new(NullAudio),
            SaveStore::in_memory(),
        )
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.state.control_mode = self.settings.control_mode;
        self.apply_audio_settings();
        self.store.set_settings(self.settings.clone());
    }

    fn apply_audio_settings(&mut self) {
        let s = &self.settings;
        self.audio.set_volume(s.master_volume, s.sfx_volume, s.muted);
    }

    pub fn start_game(&mut self) {
        self.state.start_new_game();
        self.state.control_mode = self.settings.control_mode;
        self.camera.snap_to(self.state.camera_target);
        self.banked_score = 0;
        self.banked_kills = 0;
        self.new_high_score = false;
    }

    /// Advance one display frame
    pub fn frame(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        let consumed = self.handle_screen_keys();

        let mut tick_input = if self.demo {
            let mut input = autopilot_input(&self.state);
            input.pause = self.input.to_tick_input(&self.camera).pause;
            input
        } else {
            self.input.to_tick_input(&self.camera)
        };
        if consumed {
            tick_input.pause = false;
        }
        tick(&mut self.state, &tick_input, dt);

        if self.state.control_mode != self.settings.control_mode {
            let mut settings = self.settings.clone();
            settings.control_mode = self.state.control_mode;
            self.update_settings(settings);
        }

        self.handle_debug_clicks();
        for event in self.state.drain_events() {
            self.dispatch(&event);
        }

        self.camera.follow(self.state.camera_target, dt);
        self.input.end_frame();
    }

    /// Draw the current frame
    pub fn render(&self, renderer: &mut dyn Renderer) -> usize {
        render_state(&self.state, &self.camera, renderer)
    }

    /// Transitions outside of gameplay. Returns true when a key edge was
    /// used up here and must not reach the simulation.
    fn handle_screen_keys(&mut self) -> bool {
        if self.input.is_key_just_pressed(Key::Mute) {
            let mut settings = self.settings.clone();
            settings.muted = !settings.muted;
            self.update_settings(settings);
        }

        let confirm = self.input.is_key_just_pressed(Key::Confirm);
        let options = self.input.is_key_just_pressed(Key::Options);
        let back = self.input.is_key_just_pressed(Key::Back);
        let toggle = self.input.is_key_just_pressed(Key::ToggleControl);

        match self.state.phase {
            GamePhase::Menu if confirm => self.start_game(),
            GamePhase::Menu if options => self.state.open_options(),
            GamePhase::Options if toggle => {
                let mut settings = self.settings.clone();
                settings.control_mode = settings.control_mode.toggled();
                self.update_settings(settings);
            }
            GamePhase::Options if back || options => self.state.close_options(),
            GamePhase::Paused if options => self.state.open_options(),
            GamePhase::Paused if confirm => self.state.return_to_menu(),
            GamePhase::GameOver if confirm => self.start_game(),
            GamePhase::GameOver if back => self.state.return_to_menu(),
            _ => return false,
        }
        true
    }

    fn handle_debug_clicks(&mut self) {
        let Some(kind) = self.debug_spawn else {
            return;
        };
        if self.state.phase != GamePhase::Playing {
            return;
        }
        for click in self.input.clicks().to_vec() {
            let world = self.camera.screen_to_world(click);
            if self.state.arena.contains(world) {
                self.state.try_spawn_enemy(kind, world);
            }
        }
    }

    /// Write score and kills gained since the last bank
    fn bank_progress(&mut self) {
        let score = self.state.score.saturating_sub(self.banked_score);
        let kills = self.state.kills.saturating_sub(self.banked_kills);
        self.store.add_score(score);
        self.store.add_enemies_killed(kills);
        self.banked_score = self.state.score;
        self.banked_kills = self.state.kills;
    }

    fn dispatch(&mut self, event: &GameEvent) {
        if let Some(effect) = sound_for(event) {
            self.audio.play(effect);
        }

        let shake = self.settings.effective_screen_shake();
        match *event {
            GameEvent::PlayerHit { .. } => {
                if shake {
                    self.camera.add_shake(SHAKE_PLAYER_HIT);
                }
                self.bank_progress();
                self.store.save();
            }
            GameEvent::BombDetonated { .. } if shake => self.camera.add_shake(SHAKE_BOMB),
            GameEvent::EnemyKilled {
                kind: EnemyKind::BossHexagon,
                ..
            } if shake => self.camera.add_shake(SHAKE_BOSS_KILL),
            GameEvent::WaveCleared { wave } => {
                self.store.record_wave(wave);
                self.bank_progress();
                self.store.save();
            }
            GameEvent::GameOver { score, wave, kills } => {
                self.bank_progress();
                if let Some(rank) = self.store.record_game(score, wave, kills, platform::now_ms()) {
                    log::info!("Leaderboard rank #{}", rank);
                }
                self.new_high_score = self.store.update_high_score(score);
                if self.new_high_score {
                    log::info!("New high score: {}", score);
                    self.audio.play(SoundEffect::HighScore);
                }
                self.store.save();
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.state.phase)
            .field("score", &self.state.score)
            .field("demo", &self.demo)
            .finish_non_exhaustive()
    }
}
