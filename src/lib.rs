//! Neon Wars - a neon arena twin-stick shooter
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, waves, scoring)
//! - `input`: Held-key tracking and just-pressed edge detection
//! - `camera`: World/screen transforms and target following
//! - `render`: Renderer-neutral sprite list
//! - `session`: Host-facing frame driver wiring sim, audio and persistence
//! - `audio`: Fire-and-forget sound effect sink
//! - `persistence`: Versioned save blob (stats + settings)
//! - `platform`: Browser/native differences (logging, clock, seeding)
//! - `web`: JavaScript bindings (wasm32 only)

pub mod audio;
pub mod camera;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::Session;
pub use settings::{ControlMode, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation accepts (stalls, tab backgrounding)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 2000.0;
    pub const ARENA_HEIGHT: f32 = 1400.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 320.0;
    pub const PLAYER_TURN_RATE: f32 = 4.0;
    pub const PLAYER_START_LIVES: u32 = 3;
    pub const PLAYER_FIRE_COOLDOWN: f32 = 0.12;
    /// Hitbox scale against enemy bodies
    pub const PLAYER_ENEMY_HITBOX: f32 = 0.7;
    /// Hitbox scale against enemy bullets
    pub const PLAYER_BULLET_HITBOX: f32 = 0.6;
    pub const MAX_BOMBS: u32 = 3;
    pub const START_BOMBS: u32 = 3;

    /// Invincibility window after respawn (seconds)
    pub const RESPAWN_INVINCIBILITY: f32 = 2.0;

    /// Bomb kill radius, covers the whole arena
    pub const BOMB_RADIUS: f32 = 3000.0;

    /// Score multiplier
    pub const MAX_MULTIPLIER: u32 = 100;
    pub const MULTIPLIER_DECAY_WINDOW: f32 = 3.0;

    /// Enemies may not spawn closer than this to the player
    pub const MIN_SPAWN_DISTANCE: f32 = 300.0;

    /// Secret cache corner (bottom-left)
    pub const SECRET_CACHE_SIZE: f32 = 150.0;
    pub const SECRET_CACHE_BOMBS: u32 = 3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Vector of the given length pointing along `angle`
#[inline]
pub fn from_angle(angle: f32, length: f32) -> Vec2 {
    Vec2::new(angle.cos() * length, angle.sin() * length)
}

/// Angle of a vector (radians)
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Scale `v` down so its length never exceeds `max`
#[inline]
pub fn clamp_magnitude(v: Vec2, max: f32) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > max * max && len_sq > 0.0 {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

/// Lerp factor for exponential easing at `rate` per second
#[inline]
pub fn ease_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Z component of the 3D cross product of two planar vectors
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Rotate `current` toward `target` by at most `max_delta` radians
pub fn turn_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta.clamp(-max_delta, max_delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_magnitude() {
        let v = clamp_magnitude(Vec2::new(30.0, 40.0), 10.0);
        assert!((v.length() - 10.0).abs() < 1e-4);
        assert!((v.x - 6.0).abs() < 1e-4);

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(clamp_magnitude(short, 10.0), short);
        assert_eq!(clamp_magnitude(Vec2::ZERO, 10.0), Vec2::ZERO);
    }

    #[test]
    fn test_angle_round_trip() {
        let v = from_angle(0.75, 5.0);
        assert!((heading(v) - 0.75).abs() < 1e-5);
        assert!((v.length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_turn_toward_takes_short_way() {
        // From just below +π to just above -π is a small positive turn
        let turned = turn_toward(PI - 0.1, -PI + 0.1, 0.05);
        assert!((turned - (PI - 0.05)).abs() < 1e-5);
        // Within reach snaps exactly
        assert!((turn_toward(0.0, 0.02, 0.05) - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_cross_sign() {
        assert!(cross(Vec2::X, Vec2::Y) > 0.0);
        assert!(cross(Vec2::Y, Vec2::X) < 0.0);
    }

    #[test]
    fn test_ease_factor_bounds() {
        assert_eq!(ease_factor(3.0, 0.0), 0.0);
        let f = ease_factor(3.0, 0.1);
        assert!(f > 0.0 && f < 1.0);
    }
}
