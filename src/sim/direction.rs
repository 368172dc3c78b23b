//! Grid headings and swipe decoding

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// A heading on the maze grid. Screen coordinates: +y points down.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// All headings, in the order ghosts evaluate them.
pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn as_ivec2(&self) -> IVec2 {
        (*self).into()
    }

    pub fn as_vec2(&self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Classify a touch swipe. The dominant axis wins; swipes shorter than
    /// `threshold` on that axis are ignored.
    pub fn from_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
        if dx.abs() > dy.abs() {
            if dx.abs() > threshold {
                return Some(if dx > 0.0 { Direction::Right } else { Direction::Left });
            }
        } else if dy.abs() > threshold {
            return Some(if dy > 0.0 { Direction::Down } else { Direction::Up });
        }
        None
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}
