//! Runner settings
//!
//! Read from a JSON file for the headless runner. Missing fields take their
//! defaults, so `{}` is a valid settings file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;

/// Headless run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (None = derive from the clock)
    pub seed: Option<u64>,
    /// Frames to simulate before stopping
    pub max_ticks: u64,
    /// Let the built-in autopilot play
    pub autopilot: bool,
    /// Log a status line every N ticks (0 = never)
    pub report_every: u64,
    /// Restart automatically after game over
    pub restart_on_game_over: bool,
    /// Write the final snapshot here as JSON
    pub snapshot_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: TICKS_PER_SECOND as u64 * 60 * 5,
            autopilot: true,
            report_every: TICKS_PER_SECOND as u64 * 10,
            restart_on_game_over: false,
            snapshot_path: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Invalid settings in {}: {}; using defaults", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read {}: {}; using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// The configured seed, or one derived from the system clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
