//! Game state and orchestrator-level rules
//!
//! Everything one play session owns lives here: the entity collections, the
//! seeded RNG, the id allocator, score/multiplier, lives and wave progression.
//! Per-frame sequencing lives in `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::bullet::{Bullet, EnemyBullet};
use super::enemy::{Enemy, EnemyKind, SNAKE_SEGMENT_POINTS};
use super::player::{ControlMode, Player};
use super::powerup::{PowerUp, PowerUpKind};
use super::wave::WaveState;
use crate::consts::*;

/// Top-level screen/state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    Options,
    GameOver,
}

/// Something the host may want to react to (sound, flash, persistence)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PlayerShot,
    EnemyShot,
    EnemyHit { pos: Vec2 },
    EnemyKilled { kind: EnemyKind, pos: Vec2, points: u64 },
    SegmentDestroyed { pos: Vec2, points: u64 },
    PlayerHit { lives_left: u32 },
    ShieldBlocked { pos: Vec2 },
    PowerUpCollected { kind: PowerUpKind, perpetual: bool },
    PowerUpDropped { kind: PowerUpKind, pos: Vec2 },
    BombDetonated { kills: u32 },
    /// `hostile` marks an enemy bullet
    BulletHitBorder { pos: Vec2, hostile: bool },
    WaveStarted { wave: u32, boss: bool },
    WaveCleared { wave: u32 },
    SecretCache { bombs: u32 },
    GameOver { score: u64, wave: u32, kills: u64 },
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Phase to return to when leaving Options
    options_return: GamePhase,
    pub arena: Arena,
    pub control_mode: ControlMode,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub wave: WaveState,
    pub score: u64,
    /// Kill-chain multiplier, 1..=MAX_MULTIPLIER
    pub multiplier: u32,
    /// Seconds since the last kill
    pub multiplier_timer: f32,
    pub lives: u32,
    /// Seconds of post-respawn invincibility left
    pub invincibility: f32,
    /// Where the camera should look this frame
    pub camera_target: Vec2,
    /// Enemies killed this game
    pub kills: u64,
    /// Seconds of play this game
    pub time: f32,
    /// Outgoing events, drained by the host every frame
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session in the menu with the default arena
    pub fn new(seed: u64) -> Self {
        Self::with_arena(seed, Arena::default())
    }

    pub fn with_arena(seed: u64, arena: Arena) -> Self {
        let center = arena.center();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            options_return: GamePhase::Menu,
            arena,
            control_mode: ControlMode::default(),
            player: Player::new(center),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            wave: WaveState::new(),
            score: 0,
            multiplier: 1,
            multiplier_timer: 0.0,
            lives: PLAYER_START_LIVES,
            invincibility: 0.0,
            camera_target: center,
            kills: 0,
            time: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Wipe the session and start playing from wave 0
    pub fn start_new_game(&mut self) {
        let center = self.arena.center();
        self.player.reset(center);
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.power_ups.clear();
        self.wave = WaveState::new();
        self.score = 0;
        self.multiplier = 1;
        self.multiplier_timer = 0.0;
        self.lives = PLAYER_START_LIVES;
        self.invincibility = RESPAWN_INVINCIBILITY;
        self.camera_target = center;
        self.kills = 0;
        self.time = 0.0;
        self.events.clear();
        self.next_id = 1;
        self.phase = GamePhase::Playing;
        log::info!("New game started (seed {})", self.seed);
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Options are reachable from the menu and the pause screen
    pub fn open_options(&mut self) {
        if matches!(self.phase, GamePhase::Menu | GamePhase::Paused) {
            self.options_return = self.phase;
            self.phase = GamePhase::Options;
        }
    }

    pub fn close_options(&mut self) {
        if self.phase == GamePhase::Options {
            self.phase = self.options_return;
        }
    }

    pub fn return_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Spawn an enemy scaled for the current wave.
    ///
    /// Positions closer than `MIN_SPAWN_DISTANCE` to the player are rejected
    /// and nothing is added.
    pub fn try_spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> Option<u32> {
        if pos.distance(self.player.pos) < MIN_SPAWN_DISTANCE {
            log::debug!("Rejected {} spawn at {:?}: too close to player", kind.as_str(), pos);
            return None;
        }
        let id = self.next_entity_id();
        let config = &self.wave.config;
        let enemy = Enemy::spawn(
            id,
            kind,
            pos,
            config.speed_multiplier,
            config.health_multiplier,
            &mut self.rng,
        );
        self.enemies.push(enemy);
        Some(id)
    }

    /// Score a kill and bump the multiplier. Returns the points awarded.
    pub fn award_kill(&mut self, base_points: u64) -> u64 {
        let points = self.scaled_points(base_points);
        self.score += points;
        self.multiplier = (self.multiplier + 1).min(MAX_MULTIPLIER);
        self.multiplier_timer = 0.0;
        self.kills += 1;
        points
    }

    /// Points after multiplier and Double Points
    pub fn scaled_points(&self, base_points: u64) -> u64 {
        let doubled = if self.player.power_ups.is_active(PowerUpKind::DoublePoints) {
            2
        } else {
            1
        };
        base_points * self.multiplier as u64 * doubled
    }

    /// Snake segments score without counting as kills
    pub(crate) fn award_segment(&mut self) -> u64 {
        let points = self.scaled_points(SNAKE_SEGMENT_POINTS);
        self.score += points;
        self.multiplier_timer = 0.0;
        points
    }

    /// Bookkeeping for an enemy that just died at index `index`
    pub(crate) fn on_enemy_killed(&mut self, index: usize, allow_drop: bool) {
        let Some(enemy) = self.enemies.get(index) else {
            return;
        };
        let kind = enemy.kind();
        let pos = enemy.pos;
        let points = self.award_kill(kind.points());
        self.events.push(GameEvent::EnemyKilled { kind, pos, points });

        if allow_drop && kind.drops_power_ups() {
            let roll: f32 = self.rng.random();
            if roll < self.wave.config.power_up_chance {
                let id = self.next_entity_id();
                let drop = PowerUp::random_drop(id, pos, &mut self.rng);
                self.events.push(GameEvent::PowerUpDropped { kind: drop.kind, pos });
                self.power_ups.push(drop);
            }
        }
    }

    /// Let the multiplier fall by one per idle window without kills
    pub fn decay_multiplier(&mut self, dt: f32) {
        if self.multiplier <= 1 {
            self.multiplier_timer = 0.0;
            return;
        }
        self.multiplier_timer += dt;
        if self.multiplier_timer >= MULTIPLIER_DECAY_WINDOW {
            self.multiplier -= 1;
            self.multiplier_timer = 0.0;
        }
    }

    /// The player was hit: lose a life, then respawn or end the game
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.multiplier = 1;
        self.multiplier_timer = 0.0;
        self.player.power_ups.clear_temporary();
        for bullet in &mut self.enemy_bullets {
            bullet.consume();
        }
        self.events.push(GameEvent::PlayerHit {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.player.alive = false;
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver {
                score: self.score,
                wave: self.wave.current_wave,
                kills: self.kills,
            });
            log::info!(
                "Game over: score {} wave {} kills {}",
                self.score,
                self.wave.current_wave,
                self.kills
            );
        } else {
            self.player.respawn(self.arena.center());
            self.invincibility = RESPAWN_INVINCIBILITY;
        }
    }

    /// Spend a bomb: every enemy and enemy bullet in range dies.
    /// False when no bomb was available.
    pub fn detonate_bomb(&mut self) -> bool {
        if !self.player.alive || !self.player.use_bomb() {
            return false;
        }
        let center = self.player.pos;
        let mut kills = 0;
        for i in 0..self.enemies.len() {
            let enemy = &mut self.enemies[i];
            if enemy.pos.distance(center) <= BOMB_RADIUS && enemy.kill() {
                self.on_enemy_killed(i, false);
                kills += 1;
            }
        }
        for bullet in &mut self.enemy_bullets {
            if bullet.pos().distance(center) <= BOMB_RADIUS {
                bullet.consume();
            }
        }
        self.events.push(GameEvent::BombDetonated { kills });
        log::debug!("Bomb detonated: {} kills, {} left", kills, self.player.bombs());
        true
    }

    /// Bottom-left corner refills an empty bomb stock
    pub fn check_secret_cache(&mut self) -> bool {
        if !self.player.alive || self.player.bombs() != 0 {
            return false;
        }
        let p = self.player.pos;
        if p.x > SECRET_CACHE_SIZE || p.y < self.arena.height - SECRET_CACHE_SIZE {
            return false;
        }
        let bombs = self.player.grant_bombs(SECRET_CACHE_BOMBS);
        self.events.push(GameEvent::SecretCache { bombs });
        log::info!("Secret cache found: +{} bombs", bombs);
        true
    }

    /// Drop everything that died this frame
    pub fn remove_dead(&mut self) {
        self.bullets.retain(|b| b.is_alive());
        self.enemy_bullets.retain(|b| b.is_alive());
        self.enemies.retain(|e| e.alive);
        self.power_ups.retain(|p| p.alive);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> GameState {
        let mut state = GameState::new(42);
        state.start_new_game();
        state
    }

    #[test]
    fn test_spawn_too_close_is_rejected() {
        let mut state = playing();
        assert_eq!(state.arena, Arena::new(2000.0, 1400.0));
        assert_eq!(state.player.pos, Vec2::new(1000.0, 700.0));

        assert_eq!(state.try_spawn_enemy(EnemyKind::Chaser, Vec2::new(1200.0, 700.0)), None);
        assert!(state.enemies.is_empty());

        assert!(state.try_spawn_enemy(EnemyKind::Chaser, Vec2::new(1400.0, 700.0)).is_some());
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_multiplier_climbs_and_caps() {
        let mut state = playing();
        for _ in 0..150 {
            state.award_kill(10);
            state.decay_multiplier(0.5);
        }
        assert_eq!(state.multiplier, MAX_MULTIPLIER);
    }

    #[test]
    fn test_multiplier_decays_when_idle() {
        let mut state = playing();
        state.award_kill(10);
        state.award_kill(10);
        assert_eq!(state.multiplier, 3);
        state.decay_multiplier(MULTIPLIER_DECAY_WINDOW - 0.1);
        assert_eq!(state.multiplier, 3);
        state.decay_multiplier(0.2);
        assert_eq!(state.multiplier, 2);
        state.decay_multiplier(MULTIPLIER_DECAY_WINDOW);
        assert_eq!(state.multiplier, 1);
        state.decay_multiplier(100.0);
        assert_eq!(state.multiplier, 1);
    }

    #[test]
    fn test_score_uses_multiplier_and_double_points() {
        let mut state = playing();
        assert_eq!(state.award_kill(50), 50);
        assert_eq!(state.award_kill(50), 100);
        state.player.power_ups.add(PowerUpKind::DoublePoints, 10.0, false);
        assert_eq!(state.award_kill(50), 300);
        assert_eq!(state.score, 450);
        assert_eq!(state.kills, 3);
    }

    #[test]
    fn test_losing_a_life_resets_multiplier_and_respawns() {
        let mut state = playing();
        state.award_kill(10);
        state.award_kill(10);
        state.player.pos = Vec2::new(100.0, 100.0);
        state.player.power_ups.add(PowerUpKind::Shield, 6.0, false);
        state.player.power_ups.add(PowerUpKind::RapidFire, 0.0, true);
        state.invincibility = 0.0;

        state.lose_life();
        assert_eq!(state.multiplier, 1);
        assert_eq!(state.lives, PLAYER_START_LIVES - 1);
        assert_eq!(state.player.pos, state.arena.center());
        assert!(state.is_invincible());
        assert!(!state.player.is_shielded());
        assert!(state.player.power_ups.is_perpetual(PowerUpKind::RapidFire));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = playing();
        for _ in 0..PLAYER_START_LIVES {
            state.lose_life();
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.alive);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_bomb_clears_field_and_scores() {
        let mut state = playing();
        state.try_spawn_enemy(EnemyKind::Wanderer, Vec2::new(100.0, 100.0));
        state.try_spawn_enemy(EnemyKind::Splitter, Vec2::new(1900.0, 1300.0));
        state.enemy_bullets.push(EnemyBullet::new(Vec2::new(50.0, 50.0), 0.0));

        assert!(state.detonate_bomb());
        assert!(state.enemies.iter().all(|e| !e.alive));
        assert!(state.enemy_bullets.iter().all(|b| !b.is_alive()));
        assert_eq!(state.kills, 2);
        assert!(state.score > 0);
        assert_eq!(state.player.bombs(), START_BOMBS - 1);
        // Splitter still splits when bombed
        assert_eq!(state.enemies[1].pending_splits().len(), 3);
    }

    #[test]
    fn test_bomb_without_charges_is_refused() {
        let mut state = playing();
        while state.player.use_bomb() {}
        assert!(!state.detonate_bomb());
    }

    #[test]
    fn test_secret_cache_grants_once_until_empty() {
        let mut state = playing();
        while state.player.use_bomb() {}
        state.player.pos = Vec2::new(100.0, 1385.0);

        assert!(state.check_secret_cache());
        assert_eq!(state.player.bombs(), 3);
        for _ in 0..10 {
            assert!(!state.check_secret_cache());
        }
        assert_eq!(state.player.bombs(), 3);

        while state.player.use_bomb() {}
        assert!(state.check_secret_cache());
        assert_eq!(state.player.bombs(), 3);
    }

    #[test]
    fn test_secret_cache_needs_corner() {
        let mut state = playing();
        while state.player.use_bomb() {}
        state.player.pos = Vec2::new(300.0, 1385.0);
        assert!(!state.check_secret_cache());
        state.player.pos = Vec2::new(100.0, 1100.0);
        assert!(!state.check_secret_cache());
    }

    #[test]
    fn test_phase_transitions() {
        let mut state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Menu);
        state.open_options();
        assert_eq!(state.phase, GamePhase::Options);
        state.close_options();
        assert_eq!(state.phase, GamePhase::Menu);

        state.start_new_game();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.open_options();
        state.close_options();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
        // Options are not reachable mid-game
        state.open_options();
        assert_eq!(state.phase, GamePhase::Playing);
    }
}
