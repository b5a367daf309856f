//! Power-up pickups and the per-player active-effect ledger

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::arena::Arena;
use crate::from_angle;

/// Pickup radius
pub const POWER_UP_SIZE: f32 = 14.0;
/// Seconds a pickup stays on the field
pub const POWER_UP_LIFETIME: f32 = 10.0;
/// Final seconds during which the pickup blinks before despawning
pub const POWER_UP_BLINK_WINDOW: f32 = 3.0;
/// Velocity damping per 1/60 s
const POWER_UP_DAMPING: f32 = 0.98;
/// Chance that a dropped pickup is the perpetual variant
pub const PERPETUAL_CHANCE: f64 = 0.1;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PowerUpKind {
    RapidFire,
    TripleShot,
    SpeedBoost,
    Shield,
    Piercing,
    RearShot,
    SideShot,
    DoublePoints,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 8] = [
        PowerUpKind::RapidFire,
        PowerUpKind::TripleShot,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
        PowerUpKind::Piercing,
        PowerUpKind::RearShot,
        PowerUpKind::SideShot,
        PowerUpKind::DoublePoints,
    ];

    /// Relative drop weight
    pub fn weight(self) -> f32 {
        match self {
            PowerUpKind::RapidFire => 20.0,
            PowerUpKind::TripleShot => 15.0,
            PowerUpKind::SpeedBoost => 15.0,
            PowerUpKind::Shield => 12.0,
            PowerUpKind::Piercing => 10.0,
            PowerUpKind::RearShot => 10.0,
            PowerUpKind::SideShot => 10.0,
            PowerUpKind::DoublePoints => 8.0,
        }
    }

    /// Temporary grant duration in seconds
    pub fn duration(self) -> f32 {
        match self {
            PowerUpKind::Shield => 6.0,
            _ => 10.0,
        }
    }

    pub fn can_be_perpetual(self) -> bool {
        self != PowerUpKind::Shield
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::TripleShot => "Triple Shot",
            PowerUpKind::SpeedBoost => "Speed Boost",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Piercing => "Piercing",
            PowerUpKind::RearShot => "Rear Shot",
            PowerUpKind::SideShot => "Side Shot",
            PowerUpKind::DoublePoints => "Double Points",
        }
    }

    /// Weighted random kind
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL
            .choose_weighted(rng, |kind| kind.weight())
            .copied()
            .unwrap_or(PowerUpKind::RapidFire)
    }
}

/// A pickup floating in the arena
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub is_perpetual: bool,
    pub age: f32,
    pub lifetime: f32,
    pub alive: bool,
    collected: bool,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2, vel: Vec2, is_perpetual: bool) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            is_perpetual,
            age: 0.0,
            lifetime: POWER_UP_LIFETIME,
            alive: true,
            collected: false,
        }
    }

    /// Roll a weighted kind and the perpetual variant, drifting away from `pos`
    pub fn random_drop(id: u32, pos: Vec2, rng: &mut impl Rng) -> Self {
        let kind = PowerUpKind::random(rng);
        let is_perpetual = kind.can_be_perpetual() && rng.random_bool(PERPETUAL_CHANCE);
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(60.0..140.0);
        Self::new(id, kind, pos, from_angle(angle, speed), is_perpetual)
    }

    pub fn update(&mut self, dt: f32, arena: &Arena) {
        if !self.alive {
            return;
        }
        self.age += dt;
        if self.age >= self.lifetime {
            self.alive = false;
            return;
        }
        self.pos += self.vel * dt;
        self.vel *= POWER_UP_DAMPING.powf(dt * 60.0);
        let (pos, vel) = arena.bounce(self.pos, self.vel, POWER_UP_SIZE);
        self.pos = pos;
        self.vel = vel;
    }

    /// True in the warning period before despawn
    pub fn is_blinking(&self) -> bool {
        self.alive && self.lifetime - self.age <= POWER_UP_BLINK_WINDOW
    }

    /// Mark collected. Only the first call returns true.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.alive = false;
        true
    }

    pub fn get_size(&self) -> f32 {
        POWER_UP_SIZE
    }
}

/// One active effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffect {
    pub remaining: f32,
    pub perpetual: bool,
}

/// Active power-up effects held by the player
#[derive(Debug, Clone, Default)]
pub struct PowerUpLedger {
    effects: BTreeMap<PowerUpKind, ActiveEffect>,
}

impl PowerUpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant an effect.
    ///
    /// Perpetual entries are sticky: later grants of the same kind are ignored.
    /// A perpetual grant replaces any temporary timer. Temporary grants stack
    /// their durations.
    pub fn add(&mut self, kind: PowerUpKind, duration: f32, perpetual: bool) {
        if self.is_perpetual(kind) {
            return;
        }
        if perpetual {
            self.effects.insert(
                kind,
                ActiveEffect {
                    remaining: f32::INFINITY,
                    perpetual: true,
                },
            );
            return;
        }
        self.effects
            .entry(kind)
            .and_modify(|e| e.remaining += duration)
            .or_insert(ActiveEffect {
                remaining: duration,
                perpetual: false,
            });
    }

    pub fn update(&mut self, dt: f32) {
        for effect in self.effects.values_mut() {
            if !effect.perpetual {
                effect.remaining -= dt;
            }
        }
        self.effects.retain(|_, e| e.perpetual || e.remaining > 0.0);
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.effects.contains_key(&kind)
    }

    /// Seconds left (infinite for perpetual, 0 when inactive)
    pub fn remaining_time(&self, kind: PowerUpKind) -> f32 {
        self.effects.get(&kind).map(|e| e.remaining).unwrap_or(0.0)
    }

    pub fn is_perpetual(&self, kind: PowerUpKind) -> bool {
        self.effects.get(&kind).is_some_and(|e| e.perpetual)
    }

    /// Drop every non-perpetual effect
    pub fn clear_temporary(&mut self) {
        self.effects.retain(|_, e| e.perpetual);
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Active effects in stable order (for the HUD)
    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, ActiveEffect)> + '_ {
        self.effects.iter().map(|(k, e)| (*k, *e))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
