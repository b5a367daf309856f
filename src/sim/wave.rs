//! Wave configuration and spawn pacing
//!
//! `wave_config` is a pure difficulty curve. `WaveState` runs the
//! between-waves / active cycle and says when the next spawn is due; the
//! orchestrator picks the position and confirms the spawn.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::enemy::EnemyKind;

/// Delay before wave 1 after a new game
pub const FIRST_WAVE_DELAY: f32 = 2.0;
/// Every Nth wave is a boss wave
pub const BOSS_WAVE_INTERVAL: u32 = 10;
const BOSS_SPAWN_DELAY: f32 = 4.0;
const MAX_WAVE_ENEMIES: u32 = 60;
const MIN_SPAWN_DELAY: f32 = 0.25;
const MAX_WAVE_DELAY: f32 = 6.0;
const MAX_SPEED_MULTIPLIER: f32 = 2.0;
const MAX_POWER_UP_CHANCE: f32 = 0.4;

/// Wave at which each enemy type joins the pool (cumulative)
const UNLOCKS: [(u32, EnemyKind); 7] = [
    (1, EnemyKind::Wanderer),
    (2, EnemyKind::Chaser),
    (3, EnemyKind::Diamond),
    (5, EnemyKind::Shooter),
    (7, EnemyKind::Splitter),
    (9, EnemyKind::Dodger),
    (12, EnemyKind::Snake),
];

/// Difficulty parameters for one wave
#[derive(Debug, Clone, PartialEq)]
pub struct WaveConfig {
    pub enemy_count: u32,
    /// Spawn pool, earliest unlock first
    pub enemy_types: Vec<EnemyKind>,
    /// Seconds between spawns within the wave
    pub spawn_delay: f32,
    /// Rest before the next wave once this one is cleared
    pub wave_delay: f32,
    pub speed_multiplier: f32,
    pub health_multiplier: f32,
    pub power_up_chance: f32,
    pub is_boss: bool,
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave.is_multiple_of(BOSS_WAVE_INTERVAL)
}

/// Difficulty curve for wave `wave` (1-based)
pub fn wave_config(wave: u32) -> WaveConfig {
    let n = wave.max(1);
    let step = (n - 1) as f32;
    let health_multiplier = 1.0 + 0.5 * (n / 5) as f32;
    let speed_multiplier = (1.0 + 0.04 * step).min(MAX_SPEED_MULTIPLIER);
    let power_up_chance = (0.08 + 0.02 * n as f32).min(MAX_POWER_UP_CHANCE);
    let wave_delay = (3.0 + 0.15 * n as f32).min(MAX_WAVE_DELAY);

    if is_boss_wave(wave) {
        return WaveConfig {
            enemy_count: wave / BOSS_WAVE_INTERVAL,
            enemy_types: vec![EnemyKind::BossHexagon],
            spawn_delay: BOSS_SPAWN_DELAY,
            wave_delay,
            speed_multiplier,
            health_multiplier,
            power_up_chance,
            is_boss: true,
        };
    }

    WaveConfig {
        enemy_count: (6 + 2 * n).min(MAX_WAVE_ENEMIES),
        enemy_types: UNLOCKS
            .iter()
            .filter(|(unlock, _)| n >= *unlock)
            .map(|(_, kind)| *kind)
            .collect(),
        spawn_delay: (1.2 - 0.05 * step).max(MIN_SPAWN_DELAY),
        wave_delay,
        speed_multiplier,
        health_multiplier,
        power_up_chance,
        is_boss: false,
    }
}

/// Weighted pick from the wave pool, earlier types more likely
pub fn pick_enemy_kind(config: &WaveConfig, rng: &mut impl Rng) -> EnemyKind {
    let pool = &config.enemy_types;
    let weighted: Vec<(EnemyKind, f32)> = pool
        .iter()
        .enumerate()
        .map(|(i, kind)| (*kind, (pool.len() - i) as f32))
        .collect();
    weighted
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(kind, _)| *kind)
        .unwrap_or(EnemyKind::Wanderer)
}

/// Wave transition reported by `WaveState::update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveUpdate {
    Started(u32),
    Cleared(u32),
}

/// Runtime wave progression
#[derive(Debug, Clone)]
pub struct WaveState {
    pub current_wave: u32,
    pub enemies_spawned: u32,
    pub enemies_remaining: u32,
    pub is_active: bool,
    pub between_waves: bool,
    /// Seconds until the next wave starts
    pub countdown: f32,
    spawn_timer: f32,
    pub config: WaveConfig,
}

impl Default for WaveState {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveState {
    pub fn new() -> Self {
        Self {
            current_wave: 0,
            enemies_spawned: 0,
            enemies_remaining: 0,
            is_active: false,
            between_waves: true,
            countdown: FIRST_WAVE_DELAY,
            spawn_timer: 0.0,
            config: wave_config(1),
        }
    }

    /// Advance timers. `living_enemies` is the current enemy population.
    pub fn update(&mut self, dt: f32, living_enemies: usize) -> Option<WaveUpdate> {
        let living = living_enemies as u32;

        if self.between_waves {
            self.countdown -= dt;
            if self.countdown > 0.0 {
                return None;
            }
            self.start_wave(self.current_wave + 1);
            return Some(WaveUpdate::Started(self.current_wave));
        }

        if !self.is_active {
            return None;
        }

        self.spawn_timer += dt;
        self.enemies_remaining = self.config.enemy_count.saturating_sub(self.enemies_spawned) + living;

        if self.all_spawned() && living == 0 {
            self.is_active = false;
            self.between_waves = true;
            self.countdown = self.config.wave_delay;
            self.enemies_remaining = 0;
            return Some(WaveUpdate::Cleared(self.current_wave));
        }
        None
    }

    /// Begin wave `wave` immediately
    pub fn start_wave(&mut self, wave: u32) {
        self.current_wave = wave;
        self.config = wave_config(wave);
        self.enemies_spawned = 0;
        self.enemies_remaining = self.config.enemy_count;
        self.is_active = true;
        self.between_waves = false;
        self.countdown = 0.0;
        // First enemy arrives right away
        self.spawn_timer = self.config.spawn_delay;
    }

    pub fn all_spawned(&self) -> bool {
        self.enemies_spawned >= self.config.enemy_count
    }

    /// A spawn is owed this tick
    pub fn spawn_due(&self) -> bool {
        self.is_active && !self.all_spawned() && self.spawn_timer >= self.config.spawn_delay
    }

    /// Confirm a spawn happened; rejected attempts are simply not recorded
    pub fn record_spawn(&mut self) {
        self.enemies_spawned += 1;
        self.spawn_timer = 0.0;
    }

    pub fn is_boss_wave(&self) -> bool {
        self.config.is_boss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_boss_wave_config() {
        let config = wave_config(20);
        assert!(config.is_boss);
        assert_eq!(config.enemy_types, vec![EnemyKind::BossHexagon]);
        assert_eq!(config.enemy_count, 2);

        assert!(!wave_config(0).is_boss);
        assert!(!wave_config(11).is_boss);
    }

    #[test]
    fn test_unlocks_are_cumulative() {
        let mut previous: Vec<EnemyKind> = Vec::new();
        for wave in (1..40).filter(|w| !is_boss_wave(*w)) {
            let types = wave_config(wave).enemy_types;
            assert!(previous.iter().all(|k| types.contains(k)), "wave {wave} lost a type");
            assert!(!types.contains(&EnemyKind::SplitterMini));
            assert!(!types.contains(&EnemyKind::BossHexagon));
            previous = types;
        }
        assert_eq!(wave_config(1).enemy_types, vec![EnemyKind::Wanderer]);
        assert_eq!(wave_config(12).enemy_types.len(), UNLOCKS.len());
    }

    #[test]
    fn test_curve_bounds() {
        for wave in (1..200).filter(|&w| !is_boss_wave(w)) {
            let config = wave_config(wave);
            assert!(config.spawn_delay >= MIN_SPAWN_DELAY);
            assert!(config.wave_delay <= MAX_WAVE_DELAY);
            assert!(config.power_up_chance <= MAX_POWER_UP_CHANCE);
            assert!(config.speed_multiplier <= MAX_SPEED_MULTIPLIER);
        }
        assert!(wave_config(29).spawn_delay < wave_config(2).spawn_delay);
        assert!(wave_config(15).health_multiplier > wave_config(4).health_multiplier);
    }

    #[test]
    fn test_weighted_pick_favors_early_types() {
        let config = wave_config(12);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut wanderers = 0;
        let mut snakes = 0;
        for _ in 0..4000 {
            match pick_enemy_kind(&config, &mut rng) {
                EnemyKind::Wanderer => wanderers += 1,
                EnemyKind::Snake => snakes += 1,
                _ => {}
            }
        }
        assert!(snakes > 0);
        assert!(wanderers > snakes * 3);
    }

    #[test]
    fn test_wave_cycle() {
        let mut wave = WaveState::new();
        assert!(wave.between_waves);
        assert_eq!(wave.update(1.0, 0), None);
        assert_eq!(wave.update(1.5, 0), Some(WaveUpdate::Started(1)));
        assert!(wave.is_active);

        let count = wave.config.enemy_count;
        for spawned in 0..count {
            wave.update(wave.config.spawn_delay, spawned as usize);
            assert!(wave.spawn_due());
            wave.record_spawn();
            assert!(!wave.spawn_due());
        }
        assert!(wave.all_spawned());

        // Still enemies alive: wave continues
        assert_eq!(wave.update(0.1, 3), None);
        assert_eq!(wave.enemies_remaining, 3);

        assert_eq!(wave.update(0.1, 0), Some(WaveUpdate::Cleared(1)));
        assert!(wave.between_waves);
        assert_eq!(wave.countdown, wave_config(1).wave_delay);
    }

    #[test]
    fn test_rejected_spawn_retries() {
        let mut wave = WaveState::new();
        wave.start_wave(3);
        wave.update(0.0, 0);
        assert!(wave.spawn_due());
        // Orchestrator rejected the position: nothing recorded, still due next tick
        wave.update(1.0 / 60.0, 0);
        assert!(wave.spawn_due());
        assert_eq!(wave.enemies_spawned, 0);
    }

    proptest! {
        #[test]
        fn prop_boss_wave_detection(n in 0u32..1000) {
            let config = wave_config(n);
            let boss = n > 0 && n % 10 == 0;
            prop_assert_eq!(config.enemy_types == vec![EnemyKind::BossHexagon], boss);
            if boss {
                prop_assert_eq!(config.enemy_count, n / 10);
            }
        }
    }
}
