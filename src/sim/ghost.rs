//! Pursuer agents
//!
//! Each ghost runs one of four targeting personalities ([`GhostVariant`]).
//! The director broadcasts the scatter/chase mode; power pellets and
//! collisions drive the vulnerable/eaten sub-states.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::{DIRECTIONS, Direction};
use super::maze::MazeGrid;
use super::motion::Body;
use crate::consts::*;
use crate::tuning::Tuning;

/// Ghost personalities, in spawn-marker order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostVariant {
    /// Heads straight for the player's cell
    Direct,
    /// Aims four tiles ahead of the player
    Ambush,
    /// Circles the player through rotating offsets
    Patrol,
    /// Wanders, occasionally picking a random open heading
    Random,
}

pub const GHOST_VARIANTS: [GhostVariant; 4] =
    [GhostVariant::Direct, GhostVariant::Ambush, GhostVariant::Patrol, GhostVariant::Random];

/// Offsets (col, row) the patrol ghost cycles through around the player
const PATROL_OFFSETS: [IVec2; 4] = [IVec2::new(2, 0), IVec2::new(0, 2), IVec2::new(-2, 0), IVec2::new(0, -2)];

impl GhostVariant {
    pub fn name(&self) -> &'static str {
        match self {
            GhostVariant::Direct => "blinky",
            GhostVariant::Ambush => "pinky",
            GhostVariant::Patrol => "inky",
            GhostVariant::Random => "clyde",
        }
    }

    /// Body colour as 0xRRGGBB
    pub fn color(&self) -> u32 {
        match self {
            GhostVariant::Direct => 0xFF0000,
            GhostVariant::Ambush => 0xFFB8FF,
            GhostVariant::Patrol => 0x00FFFF,
            GhostVariant::Random => 0xFFB851,
        }
    }

    /// Home-corner cell targeted while scattering
    pub fn scatter_corner(&self) -> IVec2 {
        match self {
            GhostVariant::Direct => IVec2::new(25, 1),
            GhostVariant::Ambush => IVec2::new(2, 1),
            GhostVariant::Patrol => IVec2::new(27, 30),
            GhostVariant::Random => IVec2::new(0, 30),
        }
    }

    /// Index of this ghost's spawn marker in the layout
    pub fn spawn_slot(&self) -> usize {
        match self {
            GhostVariant::Direct => 0,
            GhostVariant::Ambush => 1,
            GhostVariant::Patrol => 2,
            GhostVariant::Random => 3,
        }
    }

    /// Chase-mode steering for this personality
    pub fn chase_target(&self, ctx: &TargetContext) -> Steering {
        match self {
            GhostVariant::Direct => Steering::Toward(ctx.player_cell),
            GhostVariant::Ambush => {
                Steering::Toward(ctx.player_cell + ctx.player_direction.as_ivec2() * AMBUSH_LOOKAHEAD)
            }
            GhostVariant::Patrol => {
                let phase = (ctx.clock_ms / f64::from(PATROL_PERIOD_MS)).floor() as i64;
                Steering::Toward(ctx.player_cell + PATROL_OFFSETS[phase.rem_euclid(4) as usize])
            }
            GhostVariant::Random => Steering::Wander,
        }
    }
}

/// What a ghost steers by on a decision tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    /// Greedy step toward a grid cell
    Toward(IVec2),
    /// Keep heading, occasionally turning at random
    Wander,
}

/// Player facts a ghost may read when choosing a target
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub player_cell: IVec2,
    pub player_direction: Direction,
    /// Accumulated simulation time (ms), drives the patrol rotation
    pub clock_ms: f64,
}

/// Scatter/chase flag broadcast by the director
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorMode {
    Scatter,
    Chase,
}

/// Vulnerability/eaten condition, orthogonal to the broadcast mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GhostCondition {
    Normal,
    Vulnerable { remaining_ms: f32 },
    /// Returning to the ghost house
    Eaten,
}

/// Combined sub-state as seen by renderers and the director
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostSubState {
    Chasing,
    Scattering,
    Vulnerable,
    Eaten,
}

/// Per-ghost copy of the tuning values it needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostTuning {
    pub speed: f32,
    pub vulnerable_speed: f32,
    pub eaten_speed: f32,
    pub random_turn_chance: f64,
}

impl From<&Tuning> for GhostTuning {
    fn from(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.ghost_speed,
            vulnerable_speed: tuning.ghost_vulnerable_speed,
            eaten_speed: tuning.ghost_eaten_speed,
            random_turn_chance: tuning.random_turn_chance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub variant: GhostVariant,
    pub body: Body,
    pub mode: BehaviorMode,
    pub condition: GhostCondition,
    tuning: GhostTuning,
    spawn: Vec2,
    home: IVec2,
    /// Ticks since reset; decisions happen every `GHOST_DECISION_INTERVAL`
    decision_counter: u32,
}

impl Ghost {
    pub fn new(variant: GhostVariant, maze: &MazeGrid, tuning: GhostTuning) -> Self {
        let spawn = maze.cell_center(maze.ghost_spawn(variant.spawn_slot()));
        Self {
            variant,
            body: Body::new(spawn, Direction::Left, tuning.speed, AGENT_SIZE),
            mode: BehaviorMode::Scatter,
            condition: GhostCondition::Normal,
            tuning,
            spawn,
            home: maze.ghost_home(),
            decision_counter: 0,
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

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn sub_state(&self) -> GhostSubState {
        match (self.condition, self.mode) {
            (GhostCondition::Eaten, _) => GhostSubState::Eaten,
            (GhostCondition::Vulnerable { .. }, _) => GhostSubState::Vulnerable,
            (GhostCondition::Normal, BehaviorMode::Chase) => GhostSubState::Chasing,
            (GhostCondition::Normal, BehaviorMode::Scatter) => GhostSubState::Scattering,
        }
    }

    pub fn is_vulnerable(&self) -> bool {
        matches!(self.condition, GhostCondition::Vulnerable { .. })
    }

    pub fn is_eaten(&self) -> bool {
        self.condition == GhostCondition::Eaten
    }

    /// Remaining vulnerability (ms), zero when not vulnerable
    pub fn vulnerable_remaining(&self) -> f32 {
        match self.condition {
            GhostCondition::Vulnerable { remaining_ms } => remaining_ms.max(0.0),
            _ => 0.0,
        }
    }

    /// Vulnerable and about to recover; renderers flash the body
    pub fn is_flashing(&self) -> bool {
        self.is_vulnerable() && self.vulnerable_remaining() < VULNERABLE_FLASH_MS
    }

    /// Receive the director's scatter/chase broadcast
    pub fn set_mode(&mut self, mode: BehaviorMode) {
        self.mode = mode;
    }

    /// Enter the vulnerable window. Eaten ghosts are unaffected; an already
    /// vulnerable ghost gets a fresh window.
    pub fn make_vulnerable(&mut self, duration_ms: f32) {
        if self.is_eaten() {
            return;
        }
        self.condition = GhostCondition::Vulnerable {
            remaining_ms: duration_ms,
        };
        self.body.speed = self.tuning.vulnerable_speed;
    }

    /// Get eaten by the player. Only vulnerable ghosts can be eaten;
    /// returns whether the transition happened.
    pub fn eat(&mut self) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.condition = GhostCondition::Eaten;
        self.body.speed = self.tuning.eaten_speed;
        log::debug!("{} eaten, returning home", self.variant.name());
        true
    }

    /// Advance one tick
    pub fn update<R: Rng>(&mut self, elapsed_ms: f32, ctx: &TargetContext, maze: &MazeGrid, rng: &mut R) {
        match self.condition {
            GhostCondition::Eaten => {
                self.return_home(maze);
                return;
            }
            GhostCondition::Vulnerable { remaining_ms } => {
                let remaining_ms = remaining_ms - elapsed_ms;
                if remaining_ms <= 0.0 {
                    self.condition = GhostCondition::Normal;
                    self.body.speed = self.tuning.speed;
                } else {
                    self.condition = GhostCondition::Vulnerable { remaining_ms };
                }
            }
            GhostCondition::Normal => {}
        }

        self.decision_counter += 1;
        if self.decision_counter % GHOST_DECISION_INTERVAL == 0 {
            match self.select_target(ctx, maze) {
                Steering::Toward(target) => self.steer_toward(target, maze),
                Steering::Wander => self.wander(maze, rng),
            }
        }

        self.body.step(maze);
    }

    /// Target for the current condition and mode
    pub fn select_target(&self, ctx: &TargetContext, maze: &MazeGrid) -> Steering {
        match self.condition {
            GhostCondition::Eaten => Steering::Toward(self.home),
            GhostCondition::Vulnerable { .. } => {
                let own = self.body.cell(maze);
                let away = (own - ctx.player_cell).signum();
                Steering::Toward(own + away * FLEE_DISTANCE)
            }
            GhostCondition::Normal => match self.mode {
                BehaviorMode::Scatter => Steering::Toward(self.variant.scatter_corner()),
                BehaviorMode::Chase => self.variant.chase_target(ctx),
            },
        }
    }

    /// Headings a two-step probe finds free, in evaluation order
    fn open_directions(&self, maze: &MazeGrid) -> impl Iterator<Item = (Direction, Vec2)> {
        let distance = self.body.speed * 2.0;
        DIRECTIONS
            .into_iter()
            .filter_map(move |dir| self.body.probe(dir, distance, maze).map(|next| (dir, next)))
    }

    /// Greedy one-step pathing: the non-reversing open heading whose probe
    /// lands closest (Manhattan) to `target`. Ties keep the current heading.
    /// At a dead end the ghost may reverse.
    fn steer_toward(&mut self, target: IVec2, maze: &MazeGrid) {
        let current = self.body.direction;
        let reverse = current.opposite();

        let mut best: Option<(Direction, i32)> = None;
        let mut can_reverse = false;
        for (dir, next) in self.open_directions(maze) {
            if dir == reverse {
                can_reverse = true;
                continue;
            }
            let distance = (maze.cell_of(next) - target).abs().element_sum();
            let improves = match best {
                None => true,
                Some((best_dir, best_distance)) => {
                    distance < best_distance || (distance == best_distance && dir == current && best_dir != current)
                }
            };
            if improves {
                best = Some((dir, distance));
            }
        }

        match best {
            Some((dir, _)) => self.body.direction = dir,
            None if can_reverse => self.body.direction = reverse,
            None => {}
        }
    }

    fn wander<R: Rng>(&mut self, maze: &MazeGrid, rng: &mut R) {
        if !rng.random_bool(self.tuning.random_turn_chance) {
            return;
        }
        let open: Vec<Direction> = self.open_directions(maze).map(|(dir, _)| dir).collect();
        if !open.is_empty() {
            self.body.direction = open[rng.random_range(0..open.len())];
        }
    }

    fn return_home(&mut self, maze: &MazeGrid) {
        let home = maze.cell_center(self.home);
        if self.body.distance_to(home) < HOME_ARRIVAL_RADIUS {
            self.condition = GhostCondition::Normal;
            self.body.speed = self.tuning.speed;
            log::debug!("{} home, resuming {:?}", self.variant.name(), self.mode);
            return;
        }
        self.steer_toward(self.home, maze);
        self.body.step(maze);
    }

    /// Back to spawn with every sub-state cleared
    pub fn reset(&mut self) {
        self.body.pos = self.spawn;
        self.body.direction = Direction::Left;
        self.body.speed = self.tuning.speed;
        self.mode = BehaviorMode::Scatter;
        self.condition = GhostCondition::Normal;
        self.decision_counter = 0;
    }
}
