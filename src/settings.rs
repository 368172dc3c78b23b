//! Game settings and preferences
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! arcade defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MazeError};
use crate::sim::MazeGrid;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for the session
    pub seed: u64,
    /// Custom layout rows; the classic board when absent
    pub layout: Option<Vec<String>>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Balance ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            layout: None,
            master_volume: 0.5,
            sfx_volume: 1.0,
            muted: false,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("master_volume", self.master_volume), ("sfx_volume", self.sfx_volume)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be within 0.0-1.0")));
            }
        }
        self.tuning.validate()
    }

    /// Build the maze these settings describe
    pub fn maze(&self) -> Result<MazeGrid, MazeError> {
        match &self.layout {
            Some(rows) => MazeGrid::parse(rows.as_slice()),
            None => MazeGrid::classic(),
        }
    }
}
