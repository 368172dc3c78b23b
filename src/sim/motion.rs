//! Grid-aligned motion shared by the player and the ghosts
//!
//! Movement is continuous (pixels per tick); collision is the maze's
//! four-corner probe. Before probing, the cross-axis coordinate snaps to the
//! lane centre when within [`CENTER_THRESHOLD`], which lets agents take a
//! turn slightly before or after the exact tile centre.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::maze::MazeGrid;
use crate::consts::CENTER_THRESHOLD;

/// Position, heading and hitbox of a moving agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub direction: Direction,
    /// Pixels per tick
    pub speed: f32,
    /// Hitbox side
    pub size: f32,
}

impl Body {
    pub fn new(pos: Vec2, direction: Direction, speed: f32, size: f32) -> Self {
        Self {
            pos,
            direction,
            speed,
            size,
        }
    }

    /// Grid cell under the body's centre
    pub fn cell(&self, maze: &MazeGrid) -> IVec2 {
        maze.cell_of(self.pos)
    }

    /// True when within the centring threshold of the current tile's centre on both axes
    pub fn is_centered(&self, maze: &MazeGrid) -> bool {
        let offset = (self.pos - maze.cell_center(self.cell(maze))).abs();
        offset.max_element() <= CENTER_THRESHOLD
    }

    /// Snap the coordinate across `dir`'s axis to the lane centre if close enough
    fn lane_aligned(&self, dir: Direction, maze: &MazeGrid) -> Vec2 {
        let center = maze.cell_center(self.cell(maze));
        let mut pos = self.pos;
        if dir.is_horizontal() {
            if (pos.y - center.y).abs() <= CENTER_THRESHOLD {
                pos.y = center.y;
            }
        } else if (pos.x - center.x).abs() <= CENTER_THRESHOLD {
            pos.x = center.x;
        }
        pos
    }

    /// Where `distance` pixels along `dir` would land, or `None` if that
    /// position overlaps a wall.
    pub fn probe(&self, dir: Direction, distance: f32, maze: &MazeGrid) -> Option<Vec2> {
        let next = self.lane_aligned(dir, maze) + dir.as_vec2() * distance;
        (!maze.collides_with_wall_wrapped(next.x, next.y, self.size)).then_some(next)
    }

    /// Whether one step at the current speed along `dir` is free
    pub fn can_move(&self, dir: Direction, maze: &MazeGrid) -> bool {
        self.probe(dir, self.speed, maze).is_some()
    }

    /// Commit to `dir` if a step that way is free. Aligns to the new lane.
    pub fn try_turn(&mut self, dir: Direction, maze: &MazeGrid) -> bool {
        if !self.can_move(dir, maze) {
            return false;
        }
        self.pos = self.lane_aligned(dir, maze);
        self.direction = dir;
        true
    }

    /// Advance one step in the current direction if free, then apply the
    /// horizontal tunnel wrap. Returns whether the body moved.
    pub fn step(&mut self, maze: &MazeGrid) -> bool {
        let Some(next) = self.probe(self.direction, self.speed, maze) else {
            return false;
        };
        self.pos = next;
        self.pos.x = maze.wrap_x(self.pos.x);
        true
    }

    /// Centre-to-centre distance
    pub fn distance_to(&self, other: Vec2) -> f32 {
        self.pos.distance(other)
    }
}
