//! Player preferences
//!
//! Persisted inside the save blob (see `persistence`). Unknown or missing
//! fields fall back to defaults so older saves keep loading.

use serde::{Deserialize, Serialize};

pub use crate::sim::ControlMode;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ship steering scheme
    pub control_mode: ControlMode,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Screen shake on explosions/impacts
    pub screen_shake: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake, flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Absolute,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            screen_shake: true,
            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Volume actually applied to effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Clamp out-of-range values from hand-edited or corrupt saves
    pub fn sanitized(mut self) -> Self {
        let fix = |v: f32, default: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { default };
        self.master_volume = fix(self.master_volume, 0.8);
        self.sfx_volume = fix(self.sfx_volume, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted": true}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.control_mode, ControlMode::Absolute);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(Settings::default().effective_screen_shake());
    }

    #[test]
    fn test_sanitized_clamps_volumes() {
        let settings = Settings {
            master_volume: 4.0,
            sfx_volume: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(Settings { muted: true, ..Default::default() }.effective_volume(), 0.0);
    }
}
