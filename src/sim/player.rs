//! The player's ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::bullet::Bullet;
use super::powerup::{PowerUpKind, PowerUpLedger};
use super::tick::TickInput;
use crate::consts::*;
use crate::{ease_factor, from_angle, heading, normalize_angle};

/// Velocity easing rate toward the input-driven target velocity
const PLAYER_ACCEL_RATE: f32 = 12.0;
/// Angular offset of the two extra Triple Shot bullets
const TRIPLE_SHOT_SPREAD: f32 = 0.15;

/// How movement keys steer the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Direction keys move in screen directions, heading follows movement
    #[default]
    Absolute,
    /// Left/right rotate the ship, forward thrusts along the heading
    Relative,
}

impl ControlMode {
    pub fn toggled(self) -> Self {
        match self {
            ControlMode::Absolute => ControlMode::Relative,
            ControlMode::Relative => ControlMode::Absolute,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Absolute => "Absolute",
            ControlMode::Relative => "Relative",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ship heading (radians)
    pub rotation: f32,
    /// Gun direction, independent of heading
    pub aim_angle: f32,
    pub alive: bool,
    bombs: u32,
    fire_cooldown: f32,
    pub power_ups: PowerUpLedger,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: -std::f32::consts::FRAC_PI_2,
            aim_angle: -std::f32::consts::FRAC_PI_2,
            alive: true,
            bombs: START_BOMBS,
            fire_cooldown: 0.0,
            power_ups: PowerUpLedger::new(),
        }
    }

    /// Fresh state for a new game
    pub fn reset(&mut self, pos: Vec2) {
        *self = Self::new(pos);
    }

    /// Back in play after losing a life. Bombs carry over, temporary effects do not.
    pub fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.alive = true;
        self.fire_cooldown = 0.0;
        self.power_ups.clear_temporary();
    }

    pub fn update(&mut self, dt: f32, input: &TickInput, mode: ControlMode, arena: &Arena) {
        if !self.alive {
            return;
        }
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);

        let speed = PLAYER_SPEED * self.speed_multiplier();
        let target_vel = match mode {
            ControlMode::Absolute => {
                let dir = input.move_dir.normalize_or_zero();
                if dir != Vec2::ZERO {
                    self.rotation = heading(dir);
                }
                dir * speed
            }
            ControlMode::Relative => {
                self.rotation =
                    normalize_angle(self.rotation + input.turn.clamp(-1.0, 1.0) * PLAYER_TURN_RATE * dt);
                if input.moving_forward {
                    from_angle(self.rotation, speed)
                } else {
                    Vec2::ZERO
                }
            }
        };

        self.vel = self.vel.lerp(target_vel, ease_factor(PLAYER_ACCEL_RATE, dt));
        let moved = self.pos + self.vel * dt;
        self.pos = arena.clamp(moved, PLAYER_SIZE);
        if self.pos.x != moved.x {
            self.vel.x = 0.0;
        }
        if self.pos.y != moved.y {
            self.vel.y = 0.0;
        }

        self.aim_angle = match input.aim_target {
            Some(target) if target.distance_squared(self.pos) > 1.0 => heading(target - self.pos),
            Some(_) => self.aim_angle,
            None => self.rotation,
        };
    }

    /// Fire a volley along the aim angle. Empty while the cooldown runs.
    pub fn fire(&mut self) -> Vec<Bullet> {
        if !self.alive || self.fire_cooldown > 0.0 {
            return Vec::new();
        }
        self.fire_cooldown = PLAYER_FIRE_COOLDOWN * self.fire_rate_multiplier();

        let aim = self.aim_angle;
        let mut angles = vec![aim];
        if self.power_ups.is_active(PowerUpKind::TripleShot) {
            angles.push(aim - TRIPLE_SHOT_SPREAD);
            angles.push(aim + TRIPLE_SHOT_SPREAD);
        }
        if self.power_ups.is_active(PowerUpKind::SideShot) {
            angles.push(aim - std::f32::consts::FRAC_PI_2);
            angles.push(aim + std::f32::consts::FRAC_PI_2);
        }
        if self.power_ups.is_active(PowerUpKind::RearShot) {
            angles.push(aim + std::f32::consts::PI);
        }

        let piercing = self.power_ups.is_active(PowerUpKind::Piercing);
        angles
            .into_iter()
            .map(|a| Bullet::new(self.pos + from_angle(a, PLAYER_SIZE), a, piercing))
            .collect()
    }

    /// Cooldown scale: rapid fire shortens it to 40%
    pub fn fire_rate_multiplier(&self) -> f32 {
        if self.power_ups.is_active(PowerUpKind::RapidFire) {
            0.4
        } else {
            1.0
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        if self.power_ups.is_active(PowerUpKind::SpeedBoost) {
            1.5
        } else {
            1.0
        }
    }

    pub fn is_shielded(&self) -> bool {
        self.power_ups.is_active(PowerUpKind::Shield)
    }

    pub fn bombs(&self) -> u32 {
        self.bombs
    }

    /// Spend one bomb. False when none are left.
    pub fn use_bomb(&mut self) -> bool {
        if self.bombs == 0 {
            return false;
        }
        self.bombs -= 1;
        true
    }

    /// Gain one bomb. False when already full.
    pub fn add_bomb(&mut self) -> bool {
        if self.bombs >= MAX_BOMBS {
            return false;
        }
        self.bombs += 1;
        true
    }

    /// Gain up to `count` bombs, returns how many were added
    pub fn grant_bombs(&mut self, count: u32) -> u32 {
        let before = self.bombs;
        self.bombs = (self.bombs + count).min(MAX_BOMBS);
        self.bombs - before
    }

    pub fn get_size(&self) -> f32 {
        PLAYER_SIZE
    }

    /// Contact radius against enemy bodies
    pub fn enemy_hitbox(&self) -> f32 {
        PLAYER_SIZE * PLAYER_ENEMY_HITBOX
    }

    /// Contact radius against enemy bullets
    pub fn bullet_hitbox(&self) -> f32 {
        PLAYER_SIZE * PLAYER_BULLET_HITBOX
    }
}
