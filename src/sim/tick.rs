//! Per-frame simulation tick
//!
//! Variable timestep, capped at `MAX_FRAME_DT`. Every system runs once per
//! frame in a fixed order; entities that die mid-frame stay in their
//! collections until the final cleanup so indices remain valid throughout.

use glam::Vec2;

use super::bullet::EnemyBullet;
use super::collision::{CollisionReport, CollisionWorld, detect};
use super::enemy::{Enemy, EnemyContext, EnemyKind};
use super::state::{GameEvent, GamePhase, GameState};
use super::wave::{WaveUpdate, pick_enemy_kind};
use crate::consts::*;
use crate::from_angle;

/// Keep wave spawns this far from the walls
const SPAWN_MARGIN: f32 = 40.0;

/// Input polled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys, Absolute control mode (not normalized)
    pub move_dir: Vec2,
    /// Turn axis for Relative control mode (-1 left, +1 right)
    pub turn: f32,
    /// Thrust along heading, Relative control mode
    pub moving_forward: bool,
    pub firing: bool,
    /// Mouse position in world space
    pub aim_target: Option<Vec2>,
    /// Edge: detonate a bomb
    pub bomb: bool,
    /// Edge: switch control mode
    pub toggle_control: bool,
    /// Edge: pause toggle
    pub pause: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);

    if input.pause && matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
        state.toggle_pause();
        return;
    }
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time += dt;

    // Timers
    state.invincibility = (state.invincibility - dt).max(0.0);
    state.decay_multiplier(dt);

    // Input edges
    if input.toggle_control {
        state.control_mode = state.control_mode.toggled();
    }
    if input.bomb {
        state.detonate_bomb();
    }

    // Player
    state.player.update(dt, input, state.control_mode, &state.arena);
    if input.firing {
        let volley = state.player.fire();
        if !volley.is_empty() {
            state.bullets.extend(volley);
            state.events.push(GameEvent::PlayerShot);
        }
    }

    update_projectiles(state, dt);
    update_enemies(state, dt);

    for power_up in &mut state.power_ups {
        power_up.update(dt, &state.arena);
    }

    advance_waves(state, dt);

    let report = detect(&CollisionWorld {
        player: &state.player,
        player_vulnerable: !state.is_invincible(),
        bullets: &state.bullets,
        enemy_bullets: &state.enemy_bullets,
        enemies: &state.enemies,
        power_ups: &state.power_ups,
    });
    resolve_collisions(state, &report);
    spawn_splits(state);

    state.player.power_ups.update(dt);
    state.camera_target = state.player.pos;
    state.check_secret_cache();
    state.remove_dead();
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    for bullet in &mut state.bullets {
        bullet.update(dt, &state.arena);
        if bullet.motion.hit_border {
            state.events.push(GameEvent::BulletHitBorder {
                pos: bullet.pos(),
                hostile: false,
            });
        }
    }
    for bullet in &mut state.enemy_bullets {
        bullet.update(dt, &state.arena);
        if bullet.motion.hit_border {
            state.events.push(GameEvent::BulletHitBorder {
                pos: bullet.pos(),
                hostile: true,
            });
        }
    }
}

/// Run every enemy's behavior and collect the shots they queued
fn update_enemies(state: &mut GameState, dt: f32) {
    let ctx = EnemyContext {
        player_pos: state.player.pos,
        bullets: &state.bullets,
        arena: &state.arena,
    };
    let mut shots = Vec::new();
    for enemy in &mut state.enemies {
        enemy.update(dt, &ctx, &mut state.rng);
        shots.extend(enemy.drain_pending_shots());
    }

    if !shots.is_empty() {
        state.events.push(GameEvent::EnemyShot);
    }
    state
        .enemy_bullets
        .extend(shots.into_iter().map(|shot| EnemyBullet::new(shot.pos, shot.angle)));
}

fn advance_waves(state: &mut GameState, dt: f32) {
    let living = state.living_enemies();
    match state.wave.update(dt, living) {
        Some(WaveUpdate::Started(wave)) => {
            let boss = state.wave.is_boss_wave();
            log::info!(
                "Wave {} started: {} enemies{}",
                wave,
                state.wave.config.enemy_count,
                if boss { " (boss)" } else { "" }
            );
            state.events.push(GameEvent::WaveStarted { wave, boss });
        }
        Some(WaveUpdate::Cleared(wave)) => {
            log::info!("Wave {} cleared, score {}", wave, state.score);
            state.events.push(GameEvent::WaveCleared { wave });
        }
        None => {}
    }

    if state.wave.spawn_due() {
        let kind = pick_enemy_kind(&state.wave.config, &mut state.rng);
        let pos = state.arena.random_point(&mut state.rng, SPAWN_MARGIN);
        // A rejected position retries on a later tick
        if state.try_spawn_enemy(kind, pos).is_some() {
            state.wave.record_spawn();
        }
    }
}

fn resolve_collisions(state: &mut GameState, report: &CollisionReport) {
    for &(bi, ei) in &report.bullet_enemy {
        let id = state.enemies[ei].id;
        if !state.enemies[ei].alive || !state.bullets[bi].can_hit(id) {
            continue;
        }
        state.bullets[bi].register_hit(id);
        let pos = state.enemies[ei].pos;
        if state.enemies[ei].take_damage(1.0) {
            state.on_enemy_killed(ei, true);
        } else {
            state.events.push(GameEvent::EnemyHit { pos });
        }
    }

    resolve_segment_hits(state, &report.bullet_segment);

    for &pi in &report.player_power_up {
        let power_up = &mut state.power_ups[pi];
        if power_up.collect() {
            let (kind, perpetual) = (power_up.kind, power_up.is_perpetual);
            state.player.power_ups.add(kind, kind.duration(), perpetual);
            state.events.push(GameEvent::PowerUpCollected { kind, perpetual });
        }
    }

    // At most one life lost per frame
    let mut hit_taken = false;
    for &ei in &report.player_enemy {
        if !state.enemies[ei].alive {
            continue;
        }
        if state.player.is_shielded() {
            let pos = state.enemies[ei].pos;
            if state.enemies[ei].kill() {
                state.on_enemy_killed(ei, true);
                state.events.push(GameEvent::ShieldBlocked { pos });
            }
        } else {
            // Rammed enemies survive
            state.lose_life();
            hit_taken = true;
            break;
        }
    }

    if hit_taken {
        return;
    }
    for &bi in &report.player_enemy_bullet {
        if !state.enemy_bullets[bi].is_alive() {
            continue;
        }
        state.enemy_bullets[bi].consume();
        if state.player.is_shielded() {
            let pos = state.enemy_bullets[bi].pos();
            state.events.push(GameEvent::ShieldBlocked { pos });
        } else {
            state.lose_life();
            break;
        }
    }
}

/// Destroy hit snake segments, highest index first so earlier indices stay valid
fn resolve_segment_hits(state: &mut GameState, hits: &[(usize, usize, usize)]) {
    let mut hits = hits.to_vec();
    hits.sort_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)));

    let mut destroyed: Vec<(usize, usize)> = Vec::new();
    for (bi, ei, si) in hits {
        let id = state.enemies[ei].id;
        if destroyed.contains(&(ei, si))
            || !state.enemies[ei].alive
            || !state.bullets[bi].can_hit(id)
        {
            continue;
        }
        let Some(&pos) = state.enemies[ei].segments().get(si) else {
            continue;
        };
        state.bullets[bi].register_hit(id);
        destroyed.push((ei, si));

        let killed = state.enemies[ei].destroy_segment(si);
        let points = state.award_segment();
        state.events.push(GameEvent::SegmentDestroyed { pos, points });
        if killed {
            state.on_enemy_killed(ei, true);
        }
    }
}

/// Turn queued splitter offspring into live enemies
fn spawn_splits(state: &mut GameState) {
    let mut splits = Vec::new();
    for enemy in state.enemies.iter_mut().filter(|e| !e.alive) {
        splits.extend(enemy.drain_pending_splits());
    }
    for split in splits {
        let id = state.next_entity_id();
        let config = &state.wave.config;
        let mut mini = Enemy::spawn(
            id,
            EnemyKind::SplitterMini,
            state.arena.clamp(split.pos, EnemyKind::SplitterMini.size()),
            config.speed_multiplier,
            config.health_multiplier,
            &mut state.rng,
        );
        mini.vel = from_angle(split.angle, mini.speed);
        mini.rotation = split.angle;
        state.enemies.push(mini);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::Bullet;
    use crate::sim::powerup::{PowerUp, PowerUpKind};

    const DT: f32 = 1.0 / 60.0;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_new_game();
        state.invincibility = 0.0;
        state
    }

    fn push_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> usize {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, kind, pos));
        state.enemies.len() - 1
    }

    #[test]
    fn test_tick_only_runs_while_playing() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time, 0.0);

        state.start_new_game();
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.time > 0.0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let before = state.time;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time, before);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_delta_is_capped() {
        let mut state = playing(1);
        tick(&mut state, &TickInput::default(), 5.0);
        assert!((state.time - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_first_wave_spawns_away_from_player() {
        let mut state = playing(7);
        let mut started = false;
        for _ in 0..(4.0 / DT) as usize {
            tick(&mut state, &TickInput::default(), DT);
            started |= state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::WaveStarted { wave: 1, .. }));
        }
        assert!(started);
        assert!(!state.enemies.is_empty());
        assert_eq!(state.wave.enemies_spawned as usize, state.enemies.len());
    }

    #[test]
    fn test_bullet_kill_scores_and_multiplies() {
        let mut state = playing(3);
        let ei = push_enemy(&mut state, EnemyKind::Wanderer, Vec2::new(400.0, 400.0));
        state.bullets.push(Bullet::new(state.enemies[ei].pos, 0.0, false));
        let bullet_pos = state.enemies[ei].pos;
        // Keep the bullet on the enemy for the collision pass
        state.bullets[0].motion.vel = Vec2::ZERO;
        state.bullets[0].motion.pos = bullet_pos;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.kills, 1);
        assert_eq!(state.score, EnemyKind::Wanderer.points());
        assert_eq!(state.multiplier, 2);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_splitter_death_spawns_minis() {
        let mut state = playing(4);
        let ei = push_enemy(&mut state, EnemyKind::Splitter, Vec2::new(400.0, 400.0));
        state.enemies[ei].health = 1.0;
        let mut bullet = Bullet::new(Vec2::new(400.0, 400.0), 0.0, false);
        bullet.motion.vel = Vec2::ZERO;
        state.bullets.push(bullet);

        tick(&mut state, &TickInput::default(), DT);
        let minis = state
            .enemies
            .iter()
            .filter(|e| e.kind() == EnemyKind::SplitterMini)
            .count();
        assert_eq!(minis, 3);
    }

    #[test]
    fn test_enemy_contact_costs_one_life_per_frame() {
        let mut state = playing(5);
        let player_pos = state.player.pos;
        push_enemy(&mut state, EnemyKind::Chaser, player_pos);
        push_enemy(&mut state, EnemyKind::Chaser, player_pos + Vec2::new(2.0, 0.0));
        state.enemy_bullets.push(EnemyBullet::new(player_pos, 0.0));

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, PLAYER_START_LIVES - 1);
        assert!(state.is_invincible());

        // Invincible: overlapping hazards are ignored entirely
        let player_pos = state.player.pos;
        push_enemy(&mut state, EnemyKind::Chaser, player_pos);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, PLAYER_START_LIVES - 1);
    }

    #[test]
    fn test_ramming_without_shield_leaves_enemy_alive() {
        let mut state = playing(8);
        let player_pos = state.player.pos;
        let boss = push_enemy(&mut state, EnemyKind::BossHexagon, player_pos + Vec2::new(20.0, 0.0));
        let health = state.enemies[boss].health;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, PLAYER_START_LIVES - 1);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies[0].alive);
        assert_eq!(state.enemies[0].health, health);
        assert_eq!(state.kills, 0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_enemy_bullet_leaving_arena_emits_border_event() {
        let mut state = playing(9);
        let edge = Vec2::new(state.arena.width - 1.0, 400.0);
        state.enemy_bullets.push(EnemyBullet::new(edge, 0.0));

        tick(&mut state, &TickInput::default(), DT);
        let events = state.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::BulletHitBorder { hostile: true, .. }))
        );
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_shield_destroys_enemy_and_scores() {
        let mut state = playing(6);
        state.player.power_ups.add(PowerUpKind::Shield, 6.0, false);
        let player_pos = state.player.pos;
        push_enemy(&mut state, EnemyKind::Chaser, player_pos);
        push_enemy(&mut state, EnemyKind::Diamond, player_pos + Vec2::new(3.0, 0.0));

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, PLAYER_START_LIVES);
        assert_eq!(state.kills, 2);
        assert!(state.score > 0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_power_up_pickup_grants_effect() {
        let mut state = playing(8);
        let pos = state.player.pos;
        state
            .power_ups
            .push(PowerUp::new(99, PowerUpKind::TripleShot, pos, Vec2::ZERO, true));

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.player.power_ups.is_perpetual(PowerUpKind::TripleShot));
        assert!(state.power_ups.is_empty());
        assert!(state.drain_events().contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::TripleShot,
            perpetual: true,
        }));
    }

    #[test]
    fn test_snake_segment_hits_resolve_per_bullet() {
        let mut state = playing(9);
        let ei = push_enemy(&mut state, EnemyKind::Snake, Vec2::new(300.0, 300.0));
        let targets: Vec<Vec2> = state.enemies[ei].segments()[..3].to_vec();
        // Freeze the snake so the segments stay put for the collision pass
        state.enemies[ei].speed = 0.0;
        for target in targets {
            let mut bullet = Bullet::new(target, 0.0, false);
            bullet.motion.vel = Vec2::ZERO;
            state.bullets.push(bullet);
        }

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.enemies[0].get_segment_count(), 9 - 3);
        assert!(state.enemies[0].alive);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bomb_edge_input() {
        let mut state = playing(10);
        push_enemy(&mut state, EnemyKind::Wanderer, Vec2::new(100.0, 100.0));
        let bomb = TickInput {
            bomb: true,
            ..Default::default()
        };
        tick(&mut state, &bomb, DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.bombs(), START_BOMBS - 1);
    }

    #[test]
    fn test_secret_cache_through_tick() {
        let mut state = playing(11);
        while state.player.use_bomb() {}
        state.player.pos = Vec2::new(100.0, 1385.0);

        let mut grants = 0;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
            grants += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::SecretCache { .. }))
                .count();
        }
        assert_eq!(grants, 1);
        assert_eq!(state.player.bombs(), 3);
    }

    #[test]
    fn test_firing_spawns_bullets() {
        let mut state = playing(12);
        let input = TickInput {
            firing: true,
            aim_target: Some(state.player.pos + Vec2::new(100.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].vel().x > 0.0);
    }

    #[test]
    fn test_toggle_control_mode() {
        let mut state = playing(13);
        let input = TickInput {
            toggle_control: true,
            ..Default::default()
        };
        let before = state.control_mode;
        tick(&mut state, &input, DT);
        assert_ne!(state.control_mode, before);
    }
}
