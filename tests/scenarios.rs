//! End-to-end play scenarios driven through the public simulation API

use glam::IVec2;
use pellet_chase::Tuning;
use pellet_chase::sim::{GameEvent, GamePhase, GameState, GhostSubState, MazeGrid, TickInput, tick};

fn new_game(seed: u64) -> GameState {
    let mut state = GameState::new(MazeGrid::classic().unwrap(), Tuning::default(), seed, 0);
    tick(&mut state, &TickInput { start: true, ..Default::default() }, 0.0);
    state.drain_events();
    state
}

fn idle(state: &mut GameState, elapsed_ms: f32) {
    tick(state, &TickInput::default(), elapsed_ms);
}

fn put_player(state: &mut GameState, col: i32, row: i32) {
    state.player.body.pos = state.maze.cell_center(IVec2::new(col, row));
}

#[test]
fn power_pellet_then_eat_chain_then_multiplier_reset() {
    let mut state = new_game(3);

    // Top-left power pellet; the wall on the right pins the player there
    put_player(&mut state, 1, 3);
    idle(&mut state, 16.0);
    assert_eq!(state.score, 50);
    assert!(state.ghosts.iter().all(|g| g.sub_state() == GhostSubState::Vulnerable));

    // Two ghosts walk into the player
    let at = state.player.pos();
    state.ghosts[0].body.pos = at;
    state.ghosts[3].body.pos = at;
    idle(&mut state, 16.0);
    assert_eq!(state.score, 50 + 200 + 400);
    assert_eq!(state.ghost_multiplier, 4);

    // Next power pellet resets the multiplier; eaten ghosts stay eaten
    put_player(&mut state, 26, 3);
    idle(&mut state, 16.0);
    assert_eq!(state.ghost_multiplier, 1);
    assert_eq!(state.ghosts[0].sub_state(), GhostSubState::Eaten);
    assert_eq!(state.ghosts[1].sub_state(), GhostSubState::Vulnerable);
    assert_eq!(state.ghosts[1].vulnerable_remaining(), 8000.0 - 16.0);
}

#[test]
fn vulnerability_wears_off() {
    let mut state = new_game(4);
    put_player(&mut state, 1, 3);
    idle(&mut state, 0.0);
    // Move the player somewhere quiet so no ghost reaches it
    put_player(&mut state, 1, 29);
    for _ in 0..80 {
        idle(&mut state, 100.0);
    }
    assert!(state.ghosts.iter().all(|g| !g.is_vulnerable()));
}

#[test]
fn losing_every_life_ends_the_game() {
    let mut state = new_game(5);
    for expected_lives in [2, 1, 0] {
        state.ghosts[0].body.pos = state.player.pos();
        idle(&mut state, 16.0);
        assert_eq!(state.phase, GamePhase::Dying);
        for _ in 0..20 {
            idle(&mut state, 100.0);
        }
        assert_eq!(state.lives, expected_lives);
    }
    assert_eq!(state.phase, GamePhase::GameOver);

    // Ticks in GameOver change nothing until start
    let score = state.score;
    idle(&mut state, 100.0);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.score, score);

    tick(&mut state, &TickInput { start: true, ..Default::default() }, 16.0);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!((state.score, state.lives, state.level), (0, 3, 1));
}

#[test]
fn clearing_the_board_starts_the_next_level() {
    let mut state = new_game(6);
    let (w, h) = (state.maze.width(), state.maze.height());
    for row in 0..h {
        for col in 0..w {
            if (row, col) != (23, 15) {
                state.maze.consume_collectible(row, col);
            }
        }
    }
    assert_eq!(state.maze.remaining_collectibles(), 1);

    // The last pellet sits two tiles right of the spawn
    for _ in 0..30 {
        idle(&mut state, 16.0);
        if state.phase != GamePhase::Playing {
            break;
        }
    }
    assert_eq!(state.phase, GamePhase::LevelComplete);
    assert!(state.drain_events().contains(&GameEvent::LevelComplete { level: 1 }));

    for _ in 0..20 {
        idle(&mut state, 100.0);
    }
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.level, 2);
    assert_eq!(state.maze.remaining_collectibles(), state.maze.total_collectibles());
    assert_eq!(state.player.pos(), state.player.spawn());
}

#[test]
fn tunnel_carries_the_player_across() {
    let mut state = new_game(8);
    put_player(&mut state, 1, 14);
    state.player.body.direction = pellet_chase::sim::Direction::Left;
    state.player.set_direction(pellet_chase::sim::Direction::Left);
    for _ in 0..20 {
        idle(&mut state, 16.0);
    }
    assert!(state.player.cell(&state.maze).x > 20);
    assert_eq!(state.player.cell(&state.maze).y, 14);
}

#[test]
fn custom_tuning_changes_the_rules() {
    let tuning = Tuning {
        starting_lives: 1,
        death_hold_ms: 500.0,
        ..Default::default()
    };
    let mut state = GameState::new(MazeGrid::classic().unwrap(), tuning, 1, 0);
    tick(&mut state, &TickInput { start: true, ..Default::default() }, 0.0);
    assert_eq!(state.lives, 1);

    state.ghosts[0].body.pos = state.player.pos();
    idle(&mut state, 16.0);
    for _ in 0..5 {
        idle(&mut state, 100.0);
    }
    assert_eq!(state.phase, GamePhase::GameOver);
}
