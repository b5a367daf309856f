//! Save/load persistence
//!
//! One versioned JSON blob under a fixed key holds lifetime stats and
//! settings. A blob written by another version is never trusted wholesale:
//! it is merged over the defaults one field at a time, keeping only fields
//! the defaults know about and whose JSON type matches. Writes are
//! best-effort; a failed save is logged and gameplay carries on.

pub mod backend;
pub mod stats;

pub use backend::{MemoryBackend, SaveBackend};
#[cfg(target_arch = "wasm32")]
pub use backend::LocalStorageBackend;
pub use stats::{HighScoreEntry, Leaderboard, Stats};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::settings::Settings;

/// Storage key of the save blob
pub const SAVE_KEY: &str = "neon_wars_save";
/// Current blob layout version
pub const SAVE_VERSION: u32 = 2;

/// Everything that survives between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub stats: Stats,
    pub settings: Settings,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            stats: Stats::default(),
            settings: Settings::default(),
        }
    }
}

impl SaveData {
    /// Parse a stored blob. Never fails: unreadable input yields defaults.
    pub fn from_json(json: &str) -> Self {
        let loaded: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Corrupt save ({}), using defaults", e);
                return Self::default();
            }
        };

        let version = loaded.get("version").and_then(Value::as_u64);
        if version == Some(u64::from(SAVE_VERSION)) {
            if let Ok(data) = serde_json::from_value::<SaveData>(loaded.clone()) {
                return data.repaired();
            }
        }

        log::info!("Migrating save from version {:?} to {}", version, SAVE_VERSION);
        let Ok(defaults) = serde_json::to_value(Self::default()) else {
            return Self::default();
        };
        let merged = merge_over_defaults(defaults, &loaded);
        match serde_json::from_value::<SaveData>(merged) {
            Ok(mut data) => {
                data.version = SAVE_VERSION;
                data.repaired()
            }
            Err(e) => {
                log::warn!("Save migration failed ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    fn repaired(mut self) -> Self {
        self.stats.leaderboard.normalize();
        self.settings = self.settings.sanitized();
        self
    }
}

/// Overlay `loaded` onto `defaults`, taking only keys the defaults define and
/// whose JSON type agrees. Objects merge recursively.
pub fn merge_over_defaults(defaults: Value, loaded: &Value) -> Value {
    match (defaults, loaded) {
        (Value::Object(mut base), Value::Object(incoming)) => {
            for (key, slot) in base.iter_mut() {
                if let Some(value) = incoming.get(key) {
                    let default = std::mem::take(slot);
                    *slot = merge_over_defaults(default, value);
                }
            }
            Value::Object(base)
        }
        (Value::Number(_), Value::Number(n)) => Value::Number(n.clone()),
        (Value::String(_), Value::String(s)) => Value::String(s.clone()),
        (Value::Bool(_), Value::Bool(b)) => Value::Bool(*b),
        (Value::Array(_), Value::Array(items)) => Value::Array(items.clone()),
        (default, _) => default,
    }
}

/// Save data plus the backend it lives in
pub struct SaveStore {
    backend: Box<dyn SaveBackend>,
    data: SaveData,
}

impl SaveStore {
    /// Load once at construction
    pub fn load(backend: Box<dyn SaveBackend>) -> Self {
        let data = match backend.read(SAVE_KEY) {
            Some(json) => {
                let data = SaveData::from_json(&json);
                log::info!(
                    "Loaded save: high score {}, {} games played",
                    data.stats.high_score,
                    data.stats.games_played
                );
                data
            }
            None => {
                log::info!("No save found, starting fresh");
                SaveData::default()
            }
        };
        Self { backend, data }
    }

    /// Store backed by memory only
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryBackend::new()))
    }

    /// Platform default: LocalStorage on the web, memory elsewhere
    pub fn platform_default() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::load(Box::new(LocalStorageBackend))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::in_memory()
        }
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    pub fn stats(&self) -> &Stats {
        &self.data.stats
    }

    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.data.settings = settings;
        self.save();
    }

    pub fn add_score(&mut self, points: u64) {
        self.data.stats.add_score(points);
    }

    pub fn update_high_score(&mut self, score: u64) -> bool {
        self.data.stats.update_high_score(score)
    }

    pub fn add_enemies_killed(&mut self, count: u64) {
        self.data.stats.add_enemies_killed(count);
    }

    pub fn record_wave(&mut self, wave: u32) {
        self.data.stats.record_wave(wave);
    }

    pub fn record_game(&mut self, score: u64, wave: u32, kills: u64, timestamp: f64) -> Option<usize> {
        self.data.stats.record_game(score, wave, kills, timestamp)
    }

    /// Best-effort write of the whole blob
    pub fn save(&mut self) {
        let Some(json) = self.data.to_json() else {
            log::warn!("Failed to serialize save data");
            return;
        };
        if self.backend.write(SAVE_KEY, &json) {
            log::debug!("Saved ({} bytes)", json.len());
        } else {
            log::warn!("Save failed, storage unavailable");
        }
    }

    /// Raw stored blob, for inspection
    pub fn stored_json(&self) -> Option<String> {
        self.backend.read(SAVE_KEY)
    }
}

impl std::fmt::Debug for SaveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveStore").field("data", &self.data).finish_non_exhaustive()
    }
}
