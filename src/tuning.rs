//! Data-driven game balance
//!
//! Every number here defaults to the arcade values in [`crate::consts`];
//! a settings file may override any subset of them.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Balance knobs read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lives at the start of a game
    pub starting_lives: u8,
    /// Scatter portion of the scatter/chase cycle (ms)
    pub scatter_ms: f32,
    /// Chase portion of the scatter/chase cycle (ms)
    pub chase_ms: f32,
    /// Vulnerability window granted by a power pellet (ms)
    pub power_ms: f32,
    /// How long the Dying phase holds before lives are deducted (ms)
    pub death_hold_ms: f32,
    /// How long the LevelComplete phase holds (ms)
    pub level_complete_hold_ms: f32,
    /// Player speed (px/tick)
    pub player_speed: f32,
    /// Ghost speed while chasing or scattering (px/tick)
    pub ghost_speed: f32,
    /// Ghost speed while vulnerable (px/tick)
    pub ghost_vulnerable_speed: f32,
    /// Ghost speed while returning home after being eaten (px/tick)
    pub ghost_eaten_speed: f32,
    /// Chance per decision that the random ghost changes heading
    pub random_turn_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            scatter_ms: SCATTER_DURATION_MS,
            chase_ms: CHASE_DURATION_MS,
            power_ms: POWER_DURATION_MS,
            death_hold_ms: DEATH_DURATION_MS,
            level_complete_hold_ms: LEVEL_COMPLETE_DURATION_MS,
            player_speed: PLAYER_SPEED,
            ghost_speed: GHOST_SPEED,
            ghost_vulnerable_speed: GHOST_VULNERABLE_SPEED,
            ghost_eaten_speed: GHOST_EATEN_SPEED,
            random_turn_chance: RANDOM_TURN_CHANCE,
        }
    }
}

impl Tuning {
    /// Full scatter + chase cycle length (ms)
    pub fn mode_cycle_ms(&self) -> f32 {
        self.scatter_ms + self.chase_ms
    }

    /// Reject values the simulation cannot run with.
    ///
    /// Speeds above the centring threshold would let an agent step past a
    /// turn window without ever being centred.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1".into()));
        }
        let durations = [
            ("scatter_ms", self.scatter_ms),
            ("chase_ms", self.chase_ms),
            ("power_ms", self.power_ms),
            ("death_hold_ms", self.death_hold_ms),
            ("level_complete_hold_ms", self.level_complete_hold_ms),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a non-negative number")));
            }
        }
        if self.mode_cycle_ms() <= 0.0 {
            return Err(ConfigError::Invalid("scatter_ms + chase_ms must be positive".into()));
        }
        let speeds = [
            ("player_speed", self.player_speed),
            ("ghost_speed", self.ghost_speed),
            ("ghost_vulnerable_speed", self.ghost_vulnerable_speed),
            ("ghost_eaten_speed", self.ghost_eaten_speed),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value <= 0.0 || value > CENTER_THRESHOLD {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in (0, {CENTER_THRESHOLD}]"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.random_turn_chance) {
            return Err(ConfigError::Invalid("random_turn_chance must be in [0, 1]".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_arcade_constants() {
        let tuning = Tuning::default();
        assert_eq!(tuning.starting_lives, 3);
        assert_eq!(tuning.mode_cycle_ms(), 27000.0);
        assert_eq!(tuning.power_ms, 8000.0);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"starting_lives": 5}"#).unwrap();
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.ghost_speed, GHOST_SPEED);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut tuning = Tuning::default();
        tuning.scatter_ms = 0.0;
        tuning.chase_ms = 0.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.ghost_eaten_speed = 9.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.starting_lives = 0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.random_turn_chance = 1.5;
        assert!(tuning.validate().is_err());
    }
}
