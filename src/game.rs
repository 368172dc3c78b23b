//! Game facade
//!
//! Owns the simulation state and its collaborators. Hosts feed it input
//! events and frame deltas; renderers read it back through the accessors.

use crate::audio::{AudioCue, AudioManager, AudioSink};
use crate::clamp_elapsed;
use crate::consts::SWIPE_THRESHOLD;
use crate::error::GameResult;
use crate::highscores::HighScoreStore;
use crate::settings::Settings;
use crate::sim::{self, Direction, GameEvent, GamePhase, GameState, Ghost, MazeGrid, Player, TickInput};

/// Host input, already decoded from keys or touches
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Direction(Direction),
    /// Raw touch swipe in pixels; short swipes are ignored
    Swipe { dx: f32, dy: f32 },
    TogglePause,
    Start,
    ToggleMute,
}

pub struct Game {
    state: GameState,
    audio: AudioManager,
    store: Box<dyn HighScoreStore>,
    /// Input collected since the last tick
    pending: TickInput,
    idle_mode: bool,
    /// Unpaused wall time fed to the game (ms), for cue pooling
    audio_clock_ms: f64,
}

impl Game {
    pub fn new(settings: &Settings, sink: Box<dyn AudioSink>, store: Box<dyn HighScoreStore>) -> GameResult<Self> {
        settings.validate()?;
        let maze = settings.maze()?;
        let high_score = store.get_high_score();

        let mut audio = AudioManager::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        log::info!("New game: seed {}, high score {}", settings.seed, high_score);
        Ok(Self {
            state: GameState::new(maze, settings.tuning.clone(), settings.seed, high_score),
            audio,
            store,
            pending: TickInput::default(),
            idle_mode: false,
            audio_clock_ms: 0.0,
        })
    }

    /// Queue an input for the next tick. Mute applies immediately.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Direction(dir) => self.pending.direction = Some(dir),
            InputEvent::Swipe { dx, dy } => {
                if let Some(dir) = Direction::from_swipe(dx, dy, SWIPE_THRESHOLD) {
                    self.pending.direction = Some(dir);
                }
            }
            InputEvent::TogglePause => self.pending.pause = !self.pending.pause,
            InputEvent::Start => self.pending.start = true,
            InputEvent::ToggleMute => {
                self.audio.toggle_mute();
            }
        }
    }

    /// Let the autopilot play (attract mode)
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    /// Advance one frame and dispatch whatever happened to the collaborators
    pub fn tick(&mut self, elapsed_ms: f32) {
        let elapsed = clamp_elapsed(elapsed_ms);
        let mut input = std::mem::take(&mut self.pending);
        input.idle_mode = self.idle_mode;

        sim::tick(&mut self.state, &input, elapsed);
        if !self.state.paused {
            self.audio_clock_ms += elapsed as f64;
        }

        let mut new_high_score = None;
        for event in self.state.drain_events() {
            match event {
                GameEvent::PelletEaten => self.audio.play_pooled(AudioCue::Chomp, self.audio_clock_ms),
                GameEvent::PowerPelletEaten => self.audio.play(AudioCue::PowerUp),
                GameEvent::GhostEaten { .. } => self.audio.play(AudioCue::EatGhost),
                GameEvent::PlayerDied => self.audio.play(AudioCue::Death),
                GameEvent::MusicStart => self.audio.start_music(),
                GameEvent::MusicStop | GameEvent::GameOver { .. } => self.audio.stop_music(),
                GameEvent::HighScore(score) => new_high_score = Some(score),
                GameEvent::ModeChanged(_) | GameEvent::LevelComplete { .. } | GameEvent::LevelStarted { .. } => {}
            }
        }

        if let Some(score) = new_high_score {
            if let Err(e) = self.store.set_high_score(score) {
                log::warn!("Failed to save high score {}: {}", score, e);
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn maze(&self) -> &MazeGrid {
        &self.state.maze
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.state.ghosts
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::error::{AudioError, GameError, StoreError};
    use crate::highscores::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct CueLog(Rc<RefCell<Vec<AudioCue>>>);

    impl AudioSink for CueLog {
        fn play(&mut self, cue: AudioCue, _looped: bool) -> Result<(), AudioError> {
            self.0.borrow_mut().push(cue);
            Ok(())
        }

        fn stop(&mut self, _cue: AudioCue) -> Result<(), AudioError> {
            Ok(())
        }
    }

    /// Records saves; optionally fails them
    #[derive(Default, Clone)]
    struct SaveLog {
        saves: Rc<RefCell<Vec<u64>>>,
        fail: bool,
    }

    impl HighScoreStore for SaveLog {
        fn get_high_score(&self) -> u64 {
            0
        }

        fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.saves.borrow_mut().push(score);
            Ok(())
        }
    }

    fn started(sink: Box<dyn AudioSink>, store: Box<dyn HighScoreStore>) -> Game {
        let mut game = Game::new(&Settings::default(), sink, store).unwrap();
        game.handle_input(InputEvent::Start);
        game.tick(16.0);
        game
    }

    #[test]
    fn test_start_plays_music() {
        let cues = CueLog::default();
        let game = started(Box::new(cues.clone()), Box::new(MemoryStore::default()));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(*cues.0.borrow(), vec![AudioCue::Music]);
    }

    #[test]
    fn test_pellet_chomps_and_persists_high_score() {
        let cues = CueLog::default();
        let saves = SaveLog::default();
        let mut game = started(Box::new(cues.clone()), Box::new(saves.clone()));
        for _ in 0..20 {
            game.tick(16.0);
        }
        assert_eq!(game.score(), 10);
        assert_eq!(game.high_score(), 10);
        assert!(cues.0.borrow().contains(&AudioCue::Chomp));
        assert_eq!(*saves.saves.borrow(), vec![10]);
    }

    #[test]
    fn test_store_failure_does_not_affect_play() {
        let store = SaveLog {
            fail: true,
            ..Default::default()
        };
        let mut game = started(Box::new(NullAudio), Box::new(store));
        for _ in 0..20 {
            game.tick(16.0);
        }
        assert_eq!(game.high_score(), 10);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_high_score_loaded_from_store() {
        let game = Game::new(&Settings::default(), Box::new(NullAudio), Box::new(MemoryStore::new(5000))).unwrap();
        assert_eq!(game.high_score(), 5000);
        assert_eq!(game.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = Settings::default();
        settings.tuning.starting_lives = 0;
        let result = Game::new(&settings, Box::new(NullAudio), Box::new(MemoryStore::default()));
        assert!(matches!(result, Err(GameError::Config(_))));

        let settings = Settings {
            layout: Some(vec!["#?#".into()]),
            ..Default::default()
        };
        let result = Game::new(&settings, Box::new(NullAudio), Box::new(MemoryStore::default()));
        assert!(matches!(result, Err(GameError::Maze(_))));
    }

    #[test]
    fn test_pause_and_swipe_inputs() {
        let mut game = started(Box::new(NullAudio), Box::new(MemoryStore::default()));
        game.handle_input(InputEvent::TogglePause);
        game.tick(16.0);
        assert!(game.is_paused());

        game.handle_input(InputEvent::TogglePause);
        game.handle_input(InputEvent::Swipe { dx: -80.0, dy: 4.0 });
        game.tick(16.0);
        assert!(!game.is_paused());
        assert_eq!(game.player().direction(), Direction::Left);

        game.handle_input(InputEvent::Swipe { dx: 10.0, dy: 5.0 });
        game.tick(16.0);
        assert_eq!(game.player().next_direction, Direction::Left);
    }

    #[test]
    fn test_mute_toggles_immediately() {
        let mut game = started(Box::new(NullAudio), Box::new(MemoryStore::default()));
        game.handle_input(InputEvent::ToggleMute);
        assert!(game.is_muted());
    }
}
