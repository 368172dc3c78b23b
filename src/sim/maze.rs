//! Maze model: static tile grid plus the dynamic collectible set
//!
//! Cells are `IVec2 { x: col, y: row }`. Every query outside the grid
//! resolves to a wall, so callers never need bounds checks.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::direction::{DIRECTIONS, Direction};
use crate::consts::TILE_SIZE;
use crate::error::MazeError;

/// Kind of a single maze tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Open,
    Pellet,
    PowerPellet,
    GhostHouse,
}

/// Number of ghost spawn markers a layout must carry (`'1'..='4'`)
pub const GHOST_SPAWN_COUNT: usize = 4;

/// The classic 28x31 board.
///
/// Legend: `#` wall, `.` pellet, `o` power pellet, ` ` open, `=` ghost house,
/// `0` player spawn (open), `1` first ghost spawn (open), `2`-`4` remaining
/// ghost spawns (ghost house), `H` ghost home (ghost house). Row 14 is the
/// horizontal tunnel.
pub const CLASSIC_LAYOUT: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##    1     ##.######",
    "######.## ###==### ##.######",
    "######.## #==H===# ##.######",
    "      .   #2=3==4#   .      ",
    "######.## #======# ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......0 .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Static tile grid with per-cell collectible flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeGrid {
    width: i32,
    height: i32,
    tile_size: f32,
    tiles: Vec<TileKind>,
    /// `true` while the cell still holds its pellet or power pellet
    collectibles: Vec<bool>,
    remaining: usize,
    total: usize,
    player_spawn: IVec2,
    ghost_spawns: [IVec2; GHOST_SPAWN_COUNT],
    ghost_home: IVec2,
}

impl MazeGrid {
    /// The built-in arcade board
    pub fn classic() -> Result<Self, MazeError> {
        Self::parse(&CLASSIC_LAYOUT)
    }

    /// Build a maze from text rows (see [`CLASSIC_LAYOUT`] for the legend).
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).ok_or(MazeError::Empty)?;
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut player_spawn = None;
        let mut ghost_spawns: [Option<IVec2>; GHOST_SPAWN_COUNT] = [None; GHOST_SPAWN_COUNT];
        let mut ghost_home = None;

        let mark = |slot: &mut Option<IVec2>, ch: char, cell: IVec2| -> Result<(), MazeError> {
            if slot.replace(cell).is_some() {
                return Err(MazeError::DuplicateMarker(ch));
            }
            Ok(())
        };

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow { row, found, expected: width });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = IVec2::new(col as i32, row as i32);
                let tile = match ch {
                    '#' => TileKind::Wall,
                    '.' => TileKind::Pellet,
                    'o' => TileKind::PowerPellet,
                    ' ' => TileKind::Open,
                    '=' => TileKind::GhostHouse,
                    '0' => {
                        mark(&mut player_spawn, ch, cell)?;
                        TileKind::Open
                    }
                    '1' => {
                        mark(&mut ghost_spawns[0], ch, cell)?;
                        TileKind::Open
                    }
                    '2'..='4' => {
                        let index = (ch as u8 - b'1') as usize;
                        mark(&mut ghost_spawns[index], ch, cell)?;
                        TileKind::GhostHouse
                    }
                    'H' => {
                        mark(&mut ghost_home, ch, cell)?;
                        TileKind::GhostHouse
                    }
                    _ => return Err(MazeError::UnknownCharacter { ch, row, col }),
                };
                tiles.push(tile);
            }
        }

        let player_spawn = player_spawn.ok_or(MazeError::MissingMarker('0'))?;
        let ghost_home = ghost_home.ok_or(MazeError::MissingMarker('H'))?;
        let mut spawns = [IVec2::ZERO; GHOST_SPAWN_COUNT];
        for (i, spawn) in ghost_spawns.iter().enumerate() {
            spawns[i] = spawn.ok_or(MazeError::MissingMarker((b'1' + i as u8) as char))?;
        }

        let total = tiles
            .iter()
            .filter(|t| matches!(t, TileKind::Pellet | TileKind::PowerPellet))
            .count();

        let mut maze = Self {
            width: width as i32,
            height: height as i32,
            tile_size: TILE_SIZE,
            tiles,
            collectibles: Vec::new(),
            remaining: 0,
            total,
            player_spawn,
            ghost_spawns: spawns,
            ghost_home,
        };
        maze.reset();
        Ok(maze)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Maze width in pixels
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || row >= self.height || col < 0 || col >= self.width {
            return None;
        }
        Some((row * self.width + col) as usize)
    }

    /// Tile kind at (row, col); outside the grid is always a wall
    pub fn tile_at(&self, row: i32, col: i32) -> TileKind {
        self.index(row, col).map_or(TileKind::Wall, |i| self.tiles[i])
    }

    pub fn is_walkable(&self, row: i32, col: i32) -> bool {
        self.tile_at(row, col) != TileKind::Wall
    }

    /// Four-corner probe of a square hitbox of side `size` centred at (x, y).
    pub fn collides_with_wall(&self, x: f32, y: f32, size: f32) -> bool {
        self.corners(x, y, size)
            .into_iter()
            .any(|(row, col)| self.tile_at(row, col) == TileKind::Wall)
    }

    /// Same probe as [`Self::collides_with_wall`], but corner columns wrap
    /// around the grid width so agents can pass through tunnel rows.
    /// Rows never wrap.
    pub fn collides_with_wall_wrapped(&self, x: f32, y: f32, size: f32) -> bool {
        self.corners(x, y, size)
            .into_iter()
            .any(|(row, col)| self.tile_at(row, col.rem_euclid(self.width)) == TileKind::Wall)
    }

    fn corners(&self, x: f32, y: f32, size: f32) -> [(i32, i32); 4] {
        let half = size / 2.0;
        let cell = |px: f32, py: f32| ((py / self.tile_size).floor() as i32, (px / self.tile_size).floor() as i32);
        [
            cell(x - half, y - half),
            cell(x + half, y - half),
            cell(x - half, y + half),
            cell(x + half, y + half),
        ]
    }

    pub fn has_pellet(&self, row: i32, col: i32) -> bool {
        self.has_collectible(row, col) && self.tile_at(row, col) == TileKind::Pellet
    }

    pub fn has_power_pellet(&self, row: i32, col: i32) -> bool {
        self.has_collectible(row, col) && self.tile_at(row, col) == TileKind::PowerPellet
    }

    fn has_collectible(&self, row: i32, col: i32) -> bool {
        self.index(row, col).is_some_and(|i| self.collectibles[i])
    }

    /// Remove the collectible at (row, col), returning its score value
    /// (10 pellet, 50 power pellet, 0 if nothing is there).
    pub fn consume_collectible(&mut self, row: i32, col: i32) -> u32 {
        let Some(i) = self.index(row, col) else { return 0 };
        if !self.collectibles[i] {
            return 0;
        }
        self.collectibles[i] = false;
        self.remaining -= 1;
        match self.tiles[i] {
            TileKind::Pellet => crate::consts::PELLET_SCORE,
            TileKind::PowerPellet => crate::consts::POWER_PELLET_SCORE,
            _ => 0,
        }
    }

    pub fn remaining_collectibles(&self) -> usize {
        self.remaining
    }

    /// Collectible count of the untouched layout
    pub fn total_collectibles(&self) -> usize {
        self.total
    }

    pub fn all_collected(&self) -> bool {
        self.remaining == 0
    }

    /// Restore every collectible from the static layout
    pub fn reset(&mut self) {
        self.collectibles = self
            .tiles
            .iter()
            .map(|t| matches!(t, TileKind::Pellet | TileKind::PowerPellet))
            .collect();
        self.remaining = self.total;
    }

    /// Walkable orthogonal neighbours of a cell with the heading that reaches them
    pub fn neighbors(&self, row: i32, col: i32) -> impl Iterator<Item = (Direction, IVec2)> + '_ {
        let here = IVec2::new(col, row);
        DIRECTIONS.into_iter().filter_map(move |dir| {
            let next = here + dir.as_ivec2();
            self.is_walkable(next.y, next.x).then_some((dir, next))
        })
    }

    /// Cell containing a pixel position
    pub fn cell_of(&self, pos: Vec2) -> IVec2 {
        (pos / self.tile_size).floor().as_ivec2()
    }

    /// Pixel centre of a cell
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        (cell.as_vec2() + Vec2::splat(0.5)) * self.tile_size
    }

    pub fn player_spawn(&self) -> IVec2 {
        self.player_spawn
    }

    /// Spawn cell for the ghost with the given slot (`0..GHOST_SPAWN_COUNT`)
    pub fn ghost_spawn(&self, slot: usize) -> IVec2 {
        self.ghost_spawns[slot % GHOST_SPAWN_COUNT]
    }

    /// Shared ghost-house cell eaten ghosts return to
    pub fn ghost_home(&self) -> IVec2 {
        self.ghost_home
    }

    /// Wrap a pixel x coordinate into `[0, pixel_width)`
    pub fn wrap_x(&self, x: f32) -> f32 {
        let width = self.pixel_width();
        if x < 0.0 {
            x + width
        } else if x >= width {
            x - width
        } else {
            x
        }
    }
}
