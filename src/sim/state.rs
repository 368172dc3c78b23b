//! Game state and core simulation types
//!
//! Everything a session needs to resume deterministically lives here,
//! including the RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ghost::{BehaviorMode, GHOST_VARIANTS, Ghost, GhostTuning, GhostVariant};
use super::maze::MazeGrid;
use super::player::Player;
use crate::consts::GHOST_BASE_SCORE;
use crate::tuning::Tuning;

/// Current phase of a playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for start
    Menu,
    /// Active gameplay (see `GameState::paused`)
    Playing,
    /// Death animation hold before lives are deducted
    Dying,
    /// Board cleared, holding before the next level
    LevelComplete,
    /// Out of lives, waiting for start
    GameOver,
}

/// Things that happened during a tick, drained by the game facade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PelletEaten,
    PowerPelletEaten,
    GhostEaten { variant: GhostVariant, points: u64 },
    PlayerDied,
    ModeChanged(BehaviorMode),
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u64 },
    /// Score passed the stored high score; carries the new value
    HighScore(u64),
    MusicStart,
    MusicStop,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub maze: MazeGrid,
    pub player: Player,
    /// One ghost per variant, in `GHOST_VARIANTS` order
    pub ghosts: [Ghost; 4],
    pub phase: GamePhase,
    /// Freezes Playing; ignored in every other phase
    pub paused: bool,
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    /// 1-based
    pub level: u32,
    /// Mode most recently broadcast to the ghosts
    pub mode: BehaviorMode,
    /// Scatter/chase cycle timer (ms)
    pub mode_timer: f32,
    /// Time spent in the current Dying/LevelComplete hold (ms)
    pub phase_timer: f32,
    /// Multiplier for the next ghost eaten; doubles per eat
    pub ghost_multiplier: u64,
    /// Accumulated unpaused Playing time (ms)
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game sitting in the menu
    pub fn new(maze: MazeGrid, tuning: Tuning, seed: u64, high_score: u64) -> Self {
        let player = Player::new(maze.cell_center(maze.player_spawn()), tuning.player_speed);
        let ghost_tuning = GhostTuning::from(&tuning);
        let ghosts = GHOST_VARIANTS.map(|variant| Ghost::new(variant, &maze, ghost_tuning));
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: tuning.starting_lives,
            tuning,
            maze,
            player,
            ghosts,
            phase: GamePhase::Menu,
            paused: false,
            score: 0,
            high_score,
            level: 1,
            mode: BehaviorMode::Scatter,
            mode_timer: 0.0,
            phase_timer: 0.0,
            ghost_multiplier: 1,
            clock_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Start a fresh game from Menu or GameOver. Ignored in other phases.
    pub fn start_game(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Menu | GamePhase::GameOver) {
            return false;
        }
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.level = 1;
        self.paused = false;
        self.clock_ms = 0.0;
        self.reset_level();
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::LevelStarted { level: self.level });
        self.events.push(GameEvent::MusicStart);
        true
    }

    /// Restore collectibles, put every agent back on its spawn and restart
    /// the mode cycle in scatter
    pub fn reset_level(&mut self) {
        self.maze.reset();
        self.player.reset();
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
        self.mode = BehaviorMode::Scatter;
        self.mode_timer = 0.0;
        self.phase_timer = 0.0;
        self.ghost_multiplier = 1;
    }

    /// Flip the pause flag. Only Playing can be paused.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        self.events.push(if self.paused {
            GameEvent::MusicStop
        } else {
            GameEvent::MusicStart
        });
        true
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
        self.phase_timer = 0.0;
    }

    /// Add points; raises the high score when strictly exceeded
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::HighScore(self.high_score));
        }
    }

    /// Points for the next ghost eaten, doubling the multiplier
    pub(crate) fn next_ghost_points(&mut self) -> u64 {
        let points = GHOST_BASE_SCORE * self.ghost_multiplier;
        self.ghost_multiplier *= 2;
        points
    }

    /// Scatter iff the cycle position falls in the scatter window
    pub fn mode_at(&self, timer_ms: f32) -> BehaviorMode {
        let cycle = self.tuning.mode_cycle_ms();
        if timer_ms.rem_euclid(cycle) < self.tuning.scatter_ms {
            BehaviorMode::Scatter
        } else {
            BehaviorMode::Chase
        }
    }

    pub fn is_scatter(&self) -> bool {
        self.mode == BehaviorMode::Scatter
    }

    pub fn ghost(&self, variant: GhostVariant) -> &Ghost {
        &self.ghosts[variant.spawn_slot()]
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
