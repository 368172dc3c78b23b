//! Per-frame simulation tick
//!
//! The match director: sequences phases, drives the agents and mediates
//! every cross-agent effect (pickups, ghost collisions, scoring).

use std::collections::VecDeque;

use glam::IVec2;

use super::direction::Direction;
use super::ghost::TargetContext;
use super::state::{GameEvent, GamePhase, GameState};
use crate::clamp_elapsed;

/// Ghosts closer than this many cells (Manhattan) make the autopilot flee
const AUTOPILOT_DANGER_CELLS: i32 = 4;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Requested heading (keyboard or swipe)
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
    /// Start a game from Menu/GameOver
    pub start: bool,
    /// Idle/demo mode - the autopilot steers and restarts games
    pub idle_mode: bool,
}

/// Advance the game by one frame of `elapsed_ms`
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) {
    let dt = clamp_elapsed(elapsed_ms);

    let mut input = *input;
    if input.idle_mode {
        if matches!(state.phase, GamePhase::Menu | GamePhase::GameOver) {
            input.start = true;
        } else if state.phase == GamePhase::Playing {
            input.direction = autopilot_direction(state).or(input.direction);
        }
    }

    if input.start {
        state.start_game();
    }
    if input.pause {
        state.toggle_pause();
    }
    if let Some(dir) = input.direction.filter(|_| state.phase == GamePhase::Playing) {
        state.player.set_direction(dir);
    }

    state.time_ticks += 1;

    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => {}
        GamePhase::Playing => {
            if !state.paused {
                tick_playing(state, dt);
            }
        }
        GamePhase::Dying => tick_dying(state, dt),
        GamePhase::LevelComplete => tick_level_complete(state, dt),
    }
}

fn tick_playing(state: &mut GameState, dt: f32) {
    state.clock_ms += f64::from(dt);

    // Scatter/chase cycle
    state.mode_timer += dt;
    let mode = state.mode_at(state.mode_timer);
    if mode != state.mode {
        log::debug!("Ghost mode {:?} -> {:?}", state.mode, mode);
        state.mode = mode;
        for ghost in &mut state.ghosts {
            ghost.set_mode(mode);
        }
        state.events.push(GameEvent::ModeChanged(mode));
    }

    state.player.update(dt, &state.maze);

    // Pickups
    let cell = state.player.cell(&state.maze);
    let power = state.maze.has_power_pellet(cell.y, cell.x);
    let points = state.maze.consume_collectible(cell.y, cell.x);
    if points > 0 {
        state.add_score(points as u64);
        if power {
            let duration = state.tuning.power_ms;
            for ghost in &mut state.ghosts {
                ghost.make_vulnerable(duration);
            }
            state.ghost_multiplier = 1;
            state.events.push(GameEvent::PowerPelletEaten);
        } else {
            state.events.push(GameEvent::PelletEaten);
        }
    }

    let ctx = TargetContext {
        player_cell: cell,
        player_direction: state.player.direction(),
        clock_ms: state.clock_ms,
    };
    for ghost in &mut state.ghosts {
        ghost.update(dt, &ctx, &state.maze, &mut state.rng);
    }

    // Ghost collisions
    for i in 0..state.ghosts.len() {
        let ghost = &state.ghosts[i];
        if ghost.is_eaten() {
            continue;
        }
        let reach = (state.player.size() + ghost.size()) / 2.0;
        if state.player.body.distance_to(ghost.pos()) >= reach {
            continue;
        }
        if ghost.is_vulnerable() {
            state.ghosts[i].eat();
            let points = state.next_ghost_points();
            state.add_score(points);
            state.events.push(GameEvent::GhostEaten {
                variant: state.ghosts[i].variant,
                points,
            });
        } else {
            log::info!("Caught by {}", state.ghosts[i].variant.name());
            state.player.die();
            state.set_phase(GamePhase::Dying);
            state.events.push(GameEvent::PlayerDied);
            state.events.push(GameEvent::MusicStop);
            return;
        }
    }

    if state.maze.all_collected() {
        log::info!("Level {} complete, score {}", state.level, state.score);
        state.set_phase(GamePhase::LevelComplete);
        state.events.push(GameEvent::LevelComplete { level: state.level });
    }
}

fn tick_dying(state: &mut GameState, dt: f32) {
    state.phase_timer += dt;
    state.player.update(dt, &state.maze);
    if state.phase_timer < state.tuning.death_hold_ms {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    if state.lives > 0 {
        state.reset_level();
        state.set_phase(GamePhase::Playing);
        state.events.push(GameEvent::MusicStart);
    } else {
        log::info!("Game over, final score {}", state.score);
        state.set_phase(GamePhase::GameOver);
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

fn tick_level_complete(state: &mut GameState, dt: f32) {
    state.phase_timer += dt;
    if state.phase_timer < state.tuning.level_complete_hold_ms {
        return;
    }
    state.level += 1;
    state.reset_level();
    state.set_phase(GamePhase::Playing);
    log::info!("Level {} start", state.level);
    state.events.push(GameEvent::LevelStarted { level: state.level });
}

/// Heading for the demo autopilot: flee the nearest dangerous ghost when
/// one is close, otherwise take the first step of a shortest path to the
/// nearest collectible.
pub fn autopilot_direction(state: &GameState) -> Option<Direction> {
    let maze = &state.maze;
    let here = state.player.cell(maze);

    let threats: Vec<IVec2> = state
        .ghosts
        .iter()
        .filter(|g| !g.is_eaten() && !g.is_vulnerable())
        .map(|g| maze.cell_of(g.pos()))
        .filter(|cell| (*cell - here).abs().element_sum() < AUTOPILOT_DANGER_CELLS)
        .collect();

    if !threats.is_empty() {
        let safety = |cell: IVec2| threats.iter().map(|t| (cell - *t).abs().element_sum()).min().unwrap_or(i32::MAX);
        return maze
            .neighbors(here.y, here.x)
            .max_by_key(|(_, cell)| safety(*cell))
            .map(|(dir, _)| dir);
    }

    // Breadth-first search to the nearest collectible
    let width = maze.width();
    let index = |cell: IVec2| (cell.y * width + cell.x) as usize;
    let mut visited = vec![false; (width * maze.height()) as usize];
    let mut queue = VecDeque::new();
    if here.x < 0 || here.x >= width || here.y < 0 || here.y >= maze.height() {
        return None;
    }
    visited[index(here)] = true;
    for (dir, cell) in maze.neighbors(here.y, here.x) {
        visited[index(cell)] = true;
        queue.push_back((cell, dir));
    }
    while let Some((cell, first)) = queue.pop_front() {
        if maze.has_pellet(cell.y, cell.x) || maze.has_power_pellet(cell.y, cell.x) {
            return Some(first);
        }
        for (_, next) in maze.neighbors(cell.y, cell.x) {
            if !visited[index(next)] {
                visited[index(next)] = true;
                queue.push_back((next, first));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ghost::{BehaviorMode, GhostSubState};
    use crate::sim::maze::MazeGrid;
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(MazeGrid::classic().unwrap(), Tuning::default(), 12345, 0);
        tick(&mut state, &TickInput { start: true, ..Default::default() }, 0.0);
        state.drain_events();
        state
    }

    fn step(state: &mut GameState, elapsed_ms: f32) {
        tick(state, &TickInput::default(), elapsed_ms);
    }

    /// Park the player on a cell, facing a wall where possible
    fn place_player(state: &mut GameState, col: i32, row: i32) {
        state.player.body.pos = state.maze.cell_center(IVec2::new(col, row));
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut state = GameState::new(MazeGrid::classic().unwrap(), Tuning::default(), 1, 0);
        let start = state.player.pos();
        step(&mut state, 16.0);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.player.pos(), start);

        tick(&mut state, &TickInput { start: true, ..Default::default() }, 16.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pellet_pickup() {
        let mut state = playing();
        // Spawn is open; the first pellet to the right is at col 15
        for _ in 0..20 {
            step(&mut state, 16.0);
            if state.score > 0 {
                break;
            }
        }
        assert_eq!(state.score, 10);
        assert!(!state.maze.has_pellet(23, 15));
        assert!(state.drain_events().contains(&GameEvent::PelletEaten));
    }

    #[test]
    fn test_power_pellet_makes_ghosts_vulnerable() {
        let mut state = playing();
        state.ghosts[1].make_vulnerable(1000.0);
        state.ghosts[1].eat();
        state.ghost_multiplier = 4;

        // Power pellet at (col 1, row 3); wall to the right keeps the player on it
        place_player(&mut state, 1, 3);
        step(&mut state, 0.0);

        assert_eq!(state.score, 50);
        assert_eq!(state.ghost_multiplier, 1);
        for (i, ghost) in state.ghosts.iter().enumerate() {
            if i == 1 {
                assert_eq!(ghost.sub_state(), GhostSubState::Eaten);
            } else {
                assert_eq!(ghost.sub_state(), GhostSubState::Vulnerable);
                assert_eq!(ghost.vulnerable_remaining(), 8000.0);
            }
        }
    }

    #[test]
    fn test_ghost_eat_chain_doubles() {
        let mut state = playing();
        place_player(&mut state, 1, 1);
        for ghost in &mut state.ghosts {
            ghost.make_vulnerable(5000.0);
        }
        let at = state.player.pos();
        for ghost in state.ghosts.iter_mut().take(3) {
            ghost.body.pos = at;
        }
        step(&mut state, 16.0);

        let points: Vec<u64> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::GhostEaten { points, .. } => Some(points),
                _ => None,
            })
            .collect();
        assert_eq!(points, vec![200, 400, 800]);
        assert_eq!(state.ghost_multiplier, 8);
        assert!(state.ghosts[..3].iter().all(|g| g.is_eaten()));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_death_leads_to_game_over() {
        let mut state = playing();
        state.lives = 1;
        state.ghosts[0].body.pos = state.player.pos();
        step(&mut state, 16.0);
        assert_eq!(state.phase, GamePhase::Dying);
        assert!(state.player.is_dying());

        for _ in 0..19 {
            step(&mut state, 100.0);
        }
        assert_eq!(state.phase, GamePhase::Dying);
        assert!(state.player.death_animation_complete());
        step(&mut state, 100.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(state.drain_events().contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_death_with_lives_left_resets_level() {
        let mut state = playing();
        state.maze.consume_collectible(1, 1);
        state.ghosts[0].body.pos = state.player.pos();
        step(&mut state, 16.0);
        for _ in 0..20 {
            step(&mut state, 100.0);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 2);
        assert_eq!(state.player.pos(), state.player.spawn());
        assert!(!state.player.is_dying());
        assert_eq!(state.maze.remaining_collectibles(), state.maze.total_collectibles());
    }

    #[test]
    fn test_level_complete_advances_level() {
        let mut state = playing();
        let (w, h) = (state.maze.width(), state.maze.height());
        for row in 0..h {
            for col in 0..w {
                state.maze.consume_collectible(row, col);
            }
        }
        step(&mut state, 16.0);
        assert_eq!(state.phase, GamePhase::LevelComplete);

        for _ in 0..19 {
            step(&mut state, 100.0);
        }
        assert_eq!(state.phase, GamePhase::LevelComplete);
        step(&mut state, 100.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.maze.remaining_collectibles(), 244);
    }

    #[test]
    fn test_frame_delta_is_clamped_before_timers() {
        let mut state = playing();
        let (clock, mode_timer) = (state.clock_ms, state.mode_timer);
        step(&mut state, 10_000.0);
        assert_eq!(state.clock_ms, clock + 100.0);
        assert_eq!(state.mode_timer, mode_timer + 100.0);

        step(&mut state, -50.0);
        assert_eq!(state.clock_ms, clock + 100.0);
        assert_eq!(state.mode_timer, mode_timer + 100.0);
    }

    #[test]
    fn test_clock_keeps_frame_precision_in_long_sessions() {
        let mut state = playing();
        // Roughly 75 hours of play
        let start = (1u64 << 28) as f64;
        state.clock_ms = start;
        step(&mut state, 16.67);
        assert!((state.clock_ms - start - 16.67).abs() < 1e-3);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = playing();
        step(&mut state, 16.0);
        tick(&mut state, &TickInput { pause: true, ..Default::default() }, 16.0);
        assert!(state.paused);

        let snapshot = serde_json::to_string(&state.player).unwrap();
        let (clock, mode_timer) = (state.clock_ms, state.mode_timer);
        for _ in 0..50 {
            step(&mut state, 100.0);
        }
        assert_eq!(serde_json::to_string(&state.player).unwrap(), snapshot);
        assert_eq!(state.clock_ms, clock);
        assert_eq!(state.mode_timer, mode_timer);

        tick(&mut state, &TickInput { pause: true, ..Default::default() }, 16.0);
        assert!(!state.paused);
        assert!(state.clock_ms > clock);
    }

    #[test]
    fn test_mode_change_is_broadcast() {
        let mut state = playing();
        state.mode_timer = 6950.0;
        step(&mut state, 100.0);
        assert_eq!(state.mode, BehaviorMode::Chase);
        assert!(state.ghosts.iter().all(|g| g.mode == BehaviorMode::Chase));
        assert!(state.drain_events().contains(&GameEvent::ModeChanged(BehaviorMode::Chase)));
    }

    #[test]
    fn test_direction_ignored_outside_playing() {
        let mut state = GameState::new(MazeGrid::classic().unwrap(), Tuning::default(), 1, 0);
        tick(
            &mut state,
            &TickInput {
                direction: Some(Direction::Left),
                ..Default::default()
            },
            16.0,
        );
        assert_eq!(state.player.next_direction, Direction::Right);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(MazeGrid::classic().unwrap(), Tuning::default(), 777, 0);
        let mut b = a.clone();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input, 16.67);
            tick(&mut b, &input, 16.67);
        }
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = GameState::new(MazeGrid::classic().unwrap(), Tuning::default(), 9, 0);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, 16.67);
        }
        assert!(state.score > 0);
    }
}
