//! Demo-mode AI
//!
//! Builds a `TickInput` from a read-only view of the game: aim at the nearest
//! enemy and keep firing, steer away from whatever is closest, grab power-ups
//! when nothing is near, bomb when crowded. Used by the attract screen and
//! the headless runner.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::tick::TickInput;

/// Threats closer than this are fled from
const DANGER_RADIUS: f32 = 220.0;
/// Enemies within this radius count toward crowding
const CROWD_RADIUS: f32 = 260.0;
const CROWD_BOMB_COUNT: usize = 8;
/// Keep this far from the walls when fleeing
const WALL_MARGIN: f32 = 120.0;

/// Choose this frame's input
pub fn autopilot_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    if state.phase != GamePhase::Playing || !state.player.alive {
        return input;
    }
    let pos = state.player.pos;

    // Aim at the nearest target (snakes by their closest segment)
    let target = state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .flat_map(|e| {
            let segments = e.segments();
            if segments.is_empty() {
                vec![e.pos]
            } else {
                segments.to_vec()
            }
        })
        .min_by(|a, b| {
            a.distance_squared(pos)
                .partial_cmp(&b.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(target) = target {
        input.aim_target = Some(target);
        input.firing = true;
    }

    // Sum of repulsion from nearby threats
    let mut flee = Vec2::ZERO;
    let threats = state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .map(|e| e.pos)
        .chain(state.enemy_bullets.iter().filter(|b| b.is_alive()).map(|b| b.pos()));
    for threat in threats {
        let away = pos - threat;
        let dist = away.length();
        if dist < DANGER_RADIUS && dist > f32::EPSILON {
            flee += away / dist * (1.0 - dist / DANGER_RADIUS);
        }
    }

    // Walls push back too, so fleeing never pins the ship in a corner
    let arena = &state.arena;
    if pos.x < WALL_MARGIN {
        flee.x += 1.0;
    } else if pos.x > arena.width - WALL_MARGIN {
        flee.x -= 1.0;
    }
    if pos.y < WALL_MARGIN {
        flee.y += 1.0;
    } else if pos.y > arena.height - WALL_MARGIN {
        flee.y -= 1.0;
    }

    input.move_dir = if flee.length_squared() > 1e-4 {
        flee.normalize()
    } else if let Some(power_up) = state.power_ups.iter().filter(|p| p.alive).min_by(|a, b| {
        a.pos
            .distance_squared(pos)
            .partial_cmp(&b.pos.distance_squared(pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        (power_up.pos - pos).normalize_or_zero()
    } else {
        // Drift back toward the middle
        let to_center = arena.center() - pos;
        if to_center.length() > 200.0 {
            to_center.normalize()
        } else {
            Vec2::ZERO
        }
    };

    let crowd = state
        .enemies
        .iter()
        .filter(|e| e.alive && e.pos.distance(pos) < CROWD_RADIUS)
        .count();
    input.bomb = crowd >= CROWD_BOMB_COUNT && state.player.bombs() > 0;

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Enemy, EnemyKind};
    use crate::sim::powerup::{PowerUp, PowerUpKind};
    use crate::sim::tick::tick;

    fn playing() -> GameState {
        let mut state = GameState::new(5);
        state.start_new_game();
        state
    }

    #[test]
    fn test_idle_outside_play() {
        let state = GameState::new(5);
        let input = autopilot_input(&state);
        assert!(!input.firing);
        assert_eq!(input.move_dir, Vec2::ZERO);
    }

    #[test]
    fn test_aims_at_nearest_and_flees() {
        let mut state = playing();
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(1, EnemyKind::Chaser, pos + Vec2::new(100.0, 0.0)));
        state.enemies.push(Enemy::new(2, EnemyKind::Wanderer, pos + Vec2::new(-600.0, 0.0)));

        let input = autopilot_input(&state);
        assert!(input.firing);
        assert_eq!(input.aim_target, Some(pos + Vec2::new(100.0, 0.0)));
        assert!(input.move_dir.x < 0.0);
        assert!(!input.bomb);
    }

    #[test]
    fn test_bombs_when_crowded() {
        let mut state = playing();
        let pos = state.player.pos;
        for i in 0..CROWD_BOMB_COUNT {
            let angle = i as f32;
            state
                .enemies
                .push(Enemy::new(i as u32 + 1, EnemyKind::Wanderer, pos + crate::from_angle(angle, 150.0)));
        }
        assert!(autopilot_input(&state).bomb);

        while state.player.use_bomb() {}
        assert!(!autopilot_input(&state).bomb);
    }

    #[test]
    fn test_collects_power_ups_when_safe() {
        let mut state = playing();
        let pos = state.player.pos;
        state.power_ups.push(PowerUp::new(
            9,
            PowerUpKind::Shield,
            pos + Vec2::new(0.0, 150.0),
            Vec2::ZERO,
            false,
        ));
        let input = autopilot_input(&state);
        assert!(input.move_dir.y > 0.9);
    }

    #[test]
    fn test_autopilot_survives_opening_waves() {
        let mut state = playing();
        for _ in 0..(20.0 * 60.0) as usize {
            let input = autopilot_input(&state);
            tick(&mut state, &input, 1.0 / 60.0);
        }
        assert!(state.wave.current_wave >= 1);
        assert!(state.time > 0.0);
    }

    #[test]
    fn test_determinism() {
        // Same seed, same autopilot: identical games
        let mut a = playing();
        let mut b = playing();
        for _ in 0..600 {
            let input_a = autopilot_input(&a);
            let input_b = autopilot_input(&b);
            tick(&mut a, &input_a, 1.0 / 60.0);
            tick(&mut b, &input_b, 1.0 / 60.0);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.kills, b.kills);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.pos, b.player.pos);
    }
}
