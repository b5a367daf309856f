//! Camera
//!
//! Follows a world-space target with exponential smoothing and keeps the
//! view inside the arena. Converts between world and screen coordinates for
//! aiming and click-to-spawn.

use glam::Vec2;

use crate::ease_factor;
use crate::sim::Arena;

/// Follow rate (per second)
const FOLLOW_RATE: f32 = 6.0;
/// Screen shake decay (per second)
const SHAKE_DECAY: f32 = 4.0;
const MAX_SHAKE: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct Camera {
    /// World position at the center of the screen
    pub pos: Vec2,
    /// Screen size in pixels
    pub viewport: Vec2,
    arena: Arena,
    /// Current shake amplitude in pixels
    shake: f32,
    time: f32,
}

impl Camera {
    pub fn new(viewport: Vec2, arena: Arena) -> Self {
        let mut camera = Self {
            pos: arena.center(),
            viewport,
            arena,
            shake: 0.0,
            time: 0.0,
        };
        camera.pos = camera.clamped(camera.pos);
        camera
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.pos = self.clamped(self.pos);
    }

    /// Ease toward `target`
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let t = ease_factor(FOLLOW_RATE, dt);
        self.pos = self.clamped(self.pos.lerp(target, t));
        self.time += dt;
        self.shake = (self.shake - self.shake * SHAKE_DECAY * dt).max(0.0);
        if self.shake < 0.1 {
            self.shake = 0.0;
        }
    }

    /// Jump straight to `target`
    pub fn snap_to(&mut self, target: Vec2) {
        self.pos = self.clamped(target);
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.shake = (self.shake + amount).min(MAX_SHAKE);
    }

    pub fn shake_offset(&self) -> Vec2 {
        if self.shake <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new((self.time * 73.0).sin(), (self.time * 91.0).cos()) * self.shake
    }

    /// Keep the view inside the arena; center it when the arena is smaller
    fn clamped(&self, p: Vec2) -> Vec2 {
        let half = self.viewport * 0.5;
        let axis = |v: f32, half: f32, size: f32| {
            if size <= half * 2.0 {
                size * 0.5
            } else {
                v.clamp(half, size - half)
            }
        };
        Vec2::new(
            axis(p.x, half.x, self.arena.width),
            axis(p.y, half.y, self.arena.height),
        )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.pos + self.viewport * 0.5 + self.shake_offset()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen - self.viewport * 0.5 - self.shake_offset() + self.pos
    }

    /// Whether a circle at `world` touches the screen
    pub fn is_visible(&self, world: Vec2, radius: f32) -> bool {
        let screen = self.world_to_screen(world);
        screen.x + radius >= 0.0
            && screen.y + radius >= 0.0
            && screen.x - radius <= self.viewport.x
            && screen.y - radius <= self.viewport.y
    }
}
