//! The player agent

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::maze::MazeGrid;
use super::motion::Body;
use crate::consts::*;

/// Alive/dying sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Alive,
    /// Motion frozen while the death animation plays
    Dying,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Requested heading, applied as soon as it is unobstructed
    pub next_direction: Direction,
    pub state: PlayerState,
    /// Death animation progress, in nominal frames
    pub death_frame: f32,
    /// Mouth opening, oscillates between `MOUTH_MIN` and `MOUTH_MAX`
    pub mouth_angle: f32,
    pub mouth_opening: bool,
    spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2, speed: f32) -> Self {
        Self {
            body: Body::new(spawn, Direction::Right, speed, AGENT_SIZE),
            next_direction: Direction::Right,
            state: PlayerState::Alive,
            death_frame: 0.0,
            mouth_angle: MOUTH_MIN,
            mouth_opening: true,
            spawn,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn direction(&self) -> Direction {
        self.body.direction
    }

    pub fn size(&self) -> f32 {
        self.body.size
    }

    pub fn cell(&self, maze: &MazeGrid) -> IVec2 {
        self.body.cell(maze)
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Buffer a heading request
    pub fn set_direction(&mut self, dir: Direction) {
        self.next_direction = dir;
    }

    /// Advance one tick
    pub fn update(&mut self, elapsed_ms: f32, maze: &MazeGrid) {
        if self.state == PlayerState::Dying {
            self.death_frame += DEATH_ANIMATION_RATE * (elapsed_ms / NOMINAL_FRAME_MS);
            return;
        }

        if self.next_direction != self.body.direction {
            self.body.try_turn(self.next_direction, maze);
        }
        self.body.step(maze);
        self.animate_mouth();
    }

    fn animate_mouth(&mut self) {
        if self.mouth_opening {
            self.mouth_angle += MOUTH_STEP;
            if self.mouth_angle >= MOUTH_MAX {
                self.mouth_opening = false;
            }
        } else {
            self.mouth_angle -= MOUTH_STEP;
            if self.mouth_angle <= MOUTH_MIN {
                self.mouth_opening = true;
            }
        }
    }

    /// Start dying. Ignored if already dying.
    pub fn die(&mut self) {
        if self.state == PlayerState::Dying {
            return;
        }
        self.state = PlayerState::Dying;
        self.death_frame = 0.0;
    }

    pub fn is_dying(&self) -> bool {
        self.state == PlayerState::Dying
    }

    pub fn death_animation_complete(&self) -> bool {
        self.is_dying() && self.death_frame >= DEATH_ANIMATION_FRAMES
    }

    /// Death animation progress in `[0, 1]`
    pub fn death_progress(&self) -> f32 {
        (self.death_frame / DEATH_ANIMATION_FRAMES).min(1.0)
    }

    /// Back to spawn, alive, facing right
    pub fn reset(&mut self) {
        self.body.pos = self.spawn;
        self.body.direction = Direction::Right;
        self.next_direction = Direction::Right;
        self.state = PlayerState::Alive;
        self.death_frame = 0.0;
        self.mouth_angle = MOUTH_MIN;
        self.mouth_opening = true;
    }
}
