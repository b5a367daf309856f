//! Simulation module
//!
//! All gameplay logic lives here. This module has no platform dependencies:
//! - Variable timestep, capped per frame
//! - Seeded RNG only (`GameState::rng`)
//! - Cross-entity effects go through the orchestrator, never entity to entity
//! - Dead entities are filtered only at the end of a frame

pub mod arena;
pub mod autopilot;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod player;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod wave;

pub use arena::Arena;
pub use autopilot::autopilot_input;
pub use bullet::{Bullet, EnemyBullet};
pub use collision::{CollisionReport, CollisionWorld, circles_overlap, detect};
pub use enemy::{Behavior, Enemy, EnemyKind};
pub use player::{ControlMode, Player};
pub use powerup::{PowerUp, PowerUpKind, PowerUpLedger};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use wave::{WaveConfig, WaveState, wave_config};
