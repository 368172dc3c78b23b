//! Error types for the crate boundary.
//!
//! The simulation itself is total: out-of-range queries resolve to walls,
//! bad frame deltas are clamped, and terminal sub-states ignore further
//! transitions. Errors only arise while building a game (layouts, config
//! files) and from collaborators, whose failures are logged and swallowed.

use std::io;

/// Main error type for constructing and configuring a game.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Maze layout error: {0}")]
    Maze(#[from] MazeError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Error type for maze layout parsing.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    #[error("Layout has no rows")]
    Empty,
    #[error("Row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, found: usize, expected: usize },
    #[error("Unknown character {ch:?} at row {row}, col {col}")]
    UnknownCharacter { ch: char, row: usize, col: usize },
    #[error("Marker {0:?} is missing from the layout")]
    MissingMarker(char),
    #[error("Marker {0:?} appears more than once")]
    DuplicateMarker(char),
}

/// Errors loading or validating settings.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Errors from a high score store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by an audio sink.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AudioError {
    #[error("Playback failed: {0}")]
    Playback(String),
}

/// Result type for game construction.
pub type GameResult<T> = Result<T, GameError>;
