//! Rectangular arena bounds

use glam::Vec2;
use rand::Rng;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Playfield rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Clamp a point so a circle of radius `margin` stays inside
    pub fn clamp(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.clamp(margin, (self.width - margin).max(margin)),
            p.y.clamp(margin, (self.height - margin).max(margin)),
        )
    }

    /// Uniform random point at least `margin` away from every wall
    pub fn random_point(&self, rng: &mut impl Rng, margin: f32) -> Vec2 {
        let max_x = (self.width - margin).max(margin + 1.0);
        let max_y = (self.height - margin).max(margin + 1.0);
        Vec2::new(
            rng.random_range(margin..max_x),
            rng.random_range(margin..max_y),
        )
    }

    /// Elastic wall bounce for a circle. Returns corrected (position, velocity).
    pub fn bounce(&self, pos: Vec2, vel: Vec2, radius: f32) -> (Vec2, Vec2) {
        let mut pos = pos;
        let mut vel = vel;
        if pos.x < radius {
            pos.x = radius;
            vel.x = vel.x.abs();
        } else if pos.x > self.width - radius {
            pos.x = self.width - radius;
            vel.x = -vel.x.abs();
        }
        if pos.y < radius {
            pos.y = radius;
            vel.y = vel.y.abs();
        } else if pos.y > self.height - radius {
            pos.y = self.height - radius;
            vel.y = -vel.y.abs();
        }
        (pos, vel)
    }
}
