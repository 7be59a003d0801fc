//! User-facing settings
//!
//! Persisted as a small JSON document next to the save data. Loading
//! never fails the game: a missing or corrupt file falls back to the
//! defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::DEFAULT_AMBIENT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Global brightness floor in [0, 1]
    pub ambient_light: f32,
    /// Draw mirror bounds and beam hit markers
    pub debug_overlay: bool,
    /// Draw additive glow halos around lit entities
    pub glow_halos: bool,
    /// Draw the screen-covering darkness overlay
    pub darkness_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ambient_light: DEFAULT_AMBIENT,
            debug_overlay: false,
            glow_halos: true,
            darkness_overlay: true,
        }
    }
}

impl Settings {
    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    settings.ambient_light = settings.ambient_light.clamp(0.0, 1.0);
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("settings file {} is corrupt: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let settings = Settings::default();
        assert!((settings.ambient_light - DEFAULT_AMBIENT).abs() < 1e-6);
        assert!(!settings.debug_overlay);
        assert!(settings.darkness_overlay);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            ambient_light: 0.5,
            debug_overlay: true,
            ..Settings::default()
        };

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ambient_light, 0.5);
        assert!(back.debug_overlay);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/nonexistent/gloamfall-settings.json"));
        assert!((settings.ambient_light - DEFAULT_AMBIENT).abs() < 1e-6);
    }
}
