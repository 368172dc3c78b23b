//! Pellet Chase headless runner
//!
//! Plays the game in attract mode (autopilot) for a fixed number of frames
//! and prints a summary. Useful for soak runs and balance checks.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use pellet_chase::audio::LogAudio;
use pellet_chase::consts::NOMINAL_FRAME_MS;
use pellet_chase::highscores::{HighScoreStore, JsonFileStore, MemoryStore};
use pellet_chase::sim::GamePhase;
use pellet_chase::{Game, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,
    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Frame length in ms
    #[arg(long, default_value_t = NOMINAL_FRAME_MS)]
    frame_ms: f32,
    /// Settings JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Persist the high score to this JSON file
    #[arg(long)]
    high_score_file: Option<PathBuf>,
    /// Print the summary as JSON
    #[arg(long)]
    summary_json: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    games_finished: u32,
    phase: String,
    score: u64,
    high_score: u64,
    level: u32,
    lives: u8,
    remaining_collectibles: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }

    let store: Box<dyn HighScoreStore> = match &cli.high_score_file {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::default()),
    };

    let mut game = Game::new(&settings, Box::new(LogAudio), store).context("creating game")?;
    game.set_idle_mode(true);
    log::info!("Pellet Chase (headless) running {} frames, seed {}", cli.ticks, settings.seed);

    let mut games_finished = 0;
    let mut last_phase = game.phase();
    for _ in 0..cli.ticks {
        game.tick(cli.frame_ms);
        let phase = game.phase();
        if phase == GamePhase::GameOver && last_phase != GamePhase::GameOver {
            games_finished += 1;
            log::info!("Game {} over: score {}, level {}", games_finished, game.score(), game.level());
        }
        last_phase = phase;
    }

    let summary = RunSummary {
        seed: settings.seed,
        ticks: cli.ticks,
        games_finished,
        phase: format!("{:?}", game.phase()),
        score: game.score(),
        high_score: game.high_score(),
        level: game.level(),
        lives: game.lives(),
        remaining_collectibles: game.maze().remaining_collectibles(),
    };

    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("seed:        {}", summary.seed);
        println!("frames:      {}", summary.ticks);
        println!("games over:  {}", summary.games_finished);
        println!("phase:       {}", summary.phase);
        println!("score:       {}", summary.score);
        println!("high score:  {}", summary.high_score);
        println!("level:       {}", summary.level);
        println!("lives:       {}", summary.lives);
        println!("pellets left {}", summary.remaining_collectibles);
    }
    Ok(())
}
