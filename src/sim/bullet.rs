//! Player and enemy projectiles

use std::collections::VecDeque;

use glam::Vec2;

use super::arena::Arena;
use crate::from_angle;

pub const BULLET_SPEED: f32 = 900.0;
pub const BULLET_LIFETIME: f32 = 1.5;
pub const BULLET_SIZE: f32 = 4.0;

pub const ENEMY_BULLET_SPEED: f32 = 320.0;
pub const ENEMY_BULLET_LIFETIME: f32 = 4.0;
pub const ENEMY_BULLET_SIZE: f32 = 6.0;

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 8;

/// Shared projectile motion: lifetime, bounds and render trail
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub alive: bool,
    /// Set on the frame the projectile left the arena
    pub hit_border: bool,
    /// Trail history for rendering (newest first)
    pub trail: VecDeque<Vec2>,
}

impl Projectile {
    fn new(pos: Vec2, angle: f32, speed: f32, lifetime: f32) -> Self {
        Self {
            pos,
            vel: from_angle(angle, speed),
            age: 0.0,
            lifetime,
            alive: true,
            hit_border: false,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    fn update(&mut self, dt: f32, arena: &Arena) {
        if !self.alive {
            return;
        }
        self.age += dt;
        if self.age >= self.lifetime {
            self.alive = false;
            return;
        }

        self.trail.push_front(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_back();
        }

        self.pos += self.vel * dt;
        if !arena.contains(self.pos) {
            self.hit_border = true;
            self.alive = false;
        }
    }
}

/// A player bullet
#[derive(Debug, Clone)]
pub struct Bullet {
    pub motion: Projectile,
    /// Passes through enemies instead of being consumed
    pub piercing: bool,
    /// Enemies this bullet already damaged (piercing bullets hit each once)
    pub hit_ids: Vec<u32>,
}

impl Bullet {
    pub fn new(pos: Vec2, angle: f32, piercing: bool) -> Self {
        Self {
            motion: Projectile::new(pos, angle, BULLET_SPEED, BULLET_LIFETIME),
            piercing,
            hit_ids: Vec::new(),
        }
    }

    pub fn update(&mut self, dt: f32, arena: &Arena) {
        self.motion.update(dt, arena);
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.motion.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.motion.vel
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.motion.alive
    }

    pub fn get_size(&self) -> f32 {
        BULLET_SIZE
    }

    /// Whether this bullet may still damage `enemy_id`
    pub fn can_hit(&self, enemy_id: u32) -> bool {
        self.motion.alive && !self.hit_ids.contains(&enemy_id)
    }

    /// Register a hit. Non-piercing bullets are used up.
    pub fn register_hit(&mut self, enemy_id: u32) {
        self.hit_ids.push(enemy_id);
        if !self.piercing {
            self.motion.alive = false;
        }
    }
}

/// A bullet fired by an enemy at the player
#[derive(Debug, Clone)]
pub struct EnemyBullet {
    pub motion: Projectile,
}

impl EnemyBullet {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self {
            motion: Projectile::new(pos, angle, ENEMY_BULLET_SPEED, ENEMY_BULLET_LIFETIME),
        }
    }

    pub fn update(&mut self, dt: f32, arena: &Arena) {
        self.motion.update(dt, arena);
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.motion.pos
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.motion.alive
    }

    pub fn get_size(&self) -> f32 {
        ENEMY_BULLET_SIZE
    }

    pub fn consume(&mut self) {
        self.motion.alive = false;
    }
}
