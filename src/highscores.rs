//! High score persistence
//!
//! A single scalar, read once at startup and written whenever the running
//! score passes it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Where the high score lives
pub trait HighScoreStore {
    /// Stored high score; stores that cannot read report 0
    fn get_high_score(&self) -> u64;

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Process-lifetime store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    high_score: u64,
}

impl MemoryStore {
    pub fn new(high_score: u64) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryStore {
    fn get_high_score(&self) -> u64 {
        self.high_score
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.high_score = score;
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// High score kept in a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file, distinguishing a missing file from a broken one
    pub fn load(&self) -> Result<Option<u64>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(Some(record.high_score))
    }
}

impl HighScoreStore for JsonFileStore {
    fn get_high_score(&self) -> u64 {
        match self.load() {
            Ok(Some(score)) => {
                log::info!("Loaded high score {} from {}", score, self.path.display());
                score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score file {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        fs::write(&self.path, json)?;
        log::debug!("High score {} saved", score);
        Ok(())
    }
}
