//! Pellet Chase - a maze-chase arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, agents, ghost AI, match phases)
//! - `game`: Director facade wiring the simulation to its collaborators
//! - `audio`: Audio cue boundary (sink trait + mute-aware manager)
//! - `highscores`: High score persistence boundary
//! - `settings`: Player-facing settings loaded from JSON
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use game::{Game, InputEvent};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length the per-tick speeds were tuned for (60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 16.67;
    /// Largest elapsed time a single tick may apply
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Tile edge length in pixels
    pub const TILE_SIZE: f32 = 20.0;
    /// Hitbox side shared by the player and the ghosts
    pub const AGENT_SIZE: f32 = 18.0;
    /// Cross-axis distance from a tile centre within which an agent counts as centred
    pub const CENTER_THRESHOLD: f32 = 4.0;

    /// Agent speeds, pixels per tick
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const GHOST_SPEED: f32 = 1.5;
    pub const GHOST_VULNERABLE_SPEED: f32 = 1.0;
    pub const GHOST_EATEN_SPEED: f32 = 3.0;

    /// Scatter/chase cycle
    pub const SCATTER_DURATION_MS: f32 = 7000.0;
    pub const CHASE_DURATION_MS: f32 = 20000.0;

    /// Power pellet vulnerability window
    pub const POWER_DURATION_MS: f32 = 8000.0;
    /// Vulnerable ghosts start flashing when less than this remains
    pub const VULNERABLE_FLASH_MS: f32 = 2000.0;

    /// Phase holds
    pub const DEATH_DURATION_MS: f32 = 2000.0;
    pub const LEVEL_COMPLETE_DURATION_MS: f32 = 2000.0;

    pub const STARTING_LIVES: u8 = 3;

    /// Scoring
    pub const PELLET_SCORE: u32 = 10;
    pub const POWER_PELLET_SCORE: u32 = 50;
    pub const GHOST_BASE_SCORE: u64 = 200;

    /// Ghost decision throttle (re-evaluate direction every Nth tick)
    pub const GHOST_DECISION_INTERVAL: u32 = 3;
    /// Ambush target distance ahead of the player, in tiles
    pub const AMBUSH_LOOKAHEAD: i32 = 4;
    /// Flee target distance past the ghost, in tiles
    pub const FLEE_DISTANCE: i32 = 5;
    /// Patrol offset advances every this many ms of simulation time
    pub const PATROL_PERIOD_MS: f32 = 2000.0;
    /// Chance per decision that the random ghost picks a new heading
    pub const RANDOM_TURN_CHANCE: f64 = 0.05;
    /// Eaten ghosts are home once within this many pixels of the home centre
    pub const HOME_ARRIVAL_RADIUS: f32 = 5.0;

    /// Player animation
    pub const DEATH_ANIMATION_FRAMES: f32 = 60.0;
    pub const DEATH_ANIMATION_RATE: f32 = 5.0;
    pub const MOUTH_MIN: f32 = 0.2;
    pub const MOUTH_MAX: f32 = 0.8;
    pub const MOUTH_STEP: f32 = 0.1;

    /// Minimum swipe length (pixels) recognised as a direction request
    pub const SWIPE_THRESHOLD: f32 = 30.0;
}

/// Clamp a host-reported frame delta to `[0, MAX_FRAME_MS]`.
///
/// Negative and non-finite deltas become zero.
#[inline]
pub fn clamp_elapsed(elapsed_ms: f32) -> f32 {
    if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
        0.0
    } else {
        elapsed_ms.min(consts::MAX_FRAME_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_elapsed() {
        assert_eq!(clamp_elapsed(16.0), 16.0);
        assert_eq!(clamp_elapsed(-5.0), 0.0);
        assert_eq!(clamp_elapsed(250.0), consts::MAX_FRAME_MS);
        assert_eq!(clamp_elapsed(f32::NAN), 0.0);
        assert_eq!(clamp_elapsed(f32::INFINITY), 0.0);
    }
}
