//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes in clamped, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (ghosts in variant order)
//! - No rendering, audio or platform dependencies

pub mod direction;
pub mod ghost;
pub mod maze;
pub mod motion;
pub mod player;
pub mod state;
pub mod tick;

pub use direction::{DIRECTIONS, Direction};
pub use ghost::{BehaviorMode, GHOST_VARIANTS, Ghost, GhostCondition, GhostSubState, GhostVariant, Steering, TargetContext};
pub use maze::{CLASSIC_LAYOUT, MazeGrid, TileKind};
pub use motion::Body;
pub use player::{Player, PlayerState};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, autopilot_direction, tick};
