//! Audio cue boundary
//!
//! The game only decides *which* cue plays; producing sound is the job of an
//! [`AudioSink`]. Sink failures are logged and never reach the simulation.

use std::collections::HashMap;

use crate::error::AudioError;

/// Minimum gap between two plays of the same pooled cue (ms)
pub const POOL_INTERVAL_MS: f64 = 50.0;

/// Sound cues the game can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Pellet eaten (pooled)
    Chomp,
    /// Power pellet eaten
    PowerUp,
    /// Ghost eaten
    EatGhost,
    /// Player caught
    Death,
    /// Looping background music
    Music,
}

impl AudioCue {
    /// Asset name of the cue
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Chomp => "chomp",
            AudioCue::PowerUp => "powerup",
            AudioCue::EatGhost => "eatghost",
            AudioCue::Death => "death",
            AudioCue::Music => "background",
        }
    }
}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, looped: bool) -> Result<(), AudioError>;

    fn stop(&mut self, cue: AudioCue) -> Result<(), AudioError>;

    /// Output gain in `[0, 1]`
    fn set_volume(&mut self, _volume: f32) {}
}

/// Silent sink
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue, _looped: bool) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self, _cue: AudioCue) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sink that writes every cue to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue, looped: bool) -> Result<(), AudioError> {
        log::debug!("audio: play {}{}", cue.name(), if looped { " (loop)" } else { "" });
        Ok(())
    }

    fn stop(&mut self, cue: AudioCue) -> Result<(), AudioError> {
        log::debug!("audio: stop {}", cue.name());
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    music_playing: bool,
    /// Last play time of each pooled cue
    last_played: HashMap<AudioCue, f64>,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        let mut manager = Self {
            sink,
            master_volume: 0.5,
            sfx_volume: 1.0,
            muted: false,
            music_playing: false,
            last_played: HashMap::new(),
        };
        manager.apply_volume();
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.apply_volume();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
        self.apply_volume();
    }

    /// Mute/unmute all audio. Muting stops the music.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_music();
        }
        self.apply_volume();
    }

    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn apply_volume(&mut self) {
        let volume = self.effective_volume();
        self.sink.set_volume(volume);
    }

    /// Play a one-shot cue
    pub fn play(&mut self, cue: AudioCue) {
        if self.muted {
            return;
        }
        if let Err(e) = self.sink.play(cue, false) {
            log::warn!("Failed to play {}: {}", cue.name(), e);
        }
    }

    /// Play a cue unless the same cue played less than
    /// [`POOL_INTERVAL_MS`] before `now_ms`
    pub fn play_pooled(&mut self, cue: AudioCue, now_ms: f64) {
        if self.muted {
            return;
        }
        if self.last_played.get(&cue).is_some_and(|last| now_ms - last < POOL_INTERVAL_MS) {
            return;
        }
        self.last_played.insert(cue, now_ms);
        self.play(cue);
    }

    /// (Re)start the looping background music
    pub fn start_music(&mut self) {
        if self.music_playing {
            self.stop_music();
        }
        if self.muted {
            return;
        }
        match self.sink.play(AudioCue::Music, true) {
            Ok(()) => self.music_playing = true,
            Err(e) => log::warn!("Failed to start music: {}", e),
        }
    }

    pub fn stop_music(&mut self) {
        if !self.music_playing {
            return;
        }
        self.music_playing = false;
        if let Err(e) = self.sink.stop(AudioCue::Music) {
            log::warn!("Failed to stop music: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(AudioCue, bool),
        Stop(AudioCue),
    }

    /// Records calls; fails every play when `broken`
    #[derive(Default, Clone)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
        broken: bool,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: AudioCue, looped: bool) -> Result<(), AudioError> {
            if self.broken {
                return Err(AudioError::Playback("device lost".into()));
            }
            self.calls.borrow_mut().push(Call::Play(cue, looped));
            Ok(())
        }

        fn stop(&mut self, cue: AudioCue) -> Result<(), AudioError> {
            self.calls.borrow_mut().push(Call::Stop(cue));
            Ok(())
        }
    }

    #[test]
    fn test_mute_suppresses_and_stops_music() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.start_music();
        assert!(audio.is_music_playing());
        assert!(audio.toggle_mute());
        audio.play(AudioCue::Death);
        audio.start_music();
        assert_eq!(
            *recorder.calls.borrow(),
            vec![Call::Play(AudioCue::Music, true), Call::Stop(AudioCue::Music)]
        );
        assert!(!audio.toggle_mute());
        assert_eq!(audio.effective_volume(), 0.5);
    }

    #[test]
    fn test_pooled_cue_is_rate_limited() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.play_pooled(AudioCue::Chomp, 0.0);
        audio.play_pooled(AudioCue::Chomp, 30.0);
        audio.play_pooled(AudioCue::Chomp, 60.0);
        assert_eq!(recorder.calls.borrow().len(), 2);
    }

    #[test]
    fn test_sink_failure_is_swallowed() {
        let recorder = Recorder {
            broken: true,
            ..Default::default()
        };
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.play(AudioCue::PowerUp);
        audio.start_music();
        assert!(!audio.is_music_playing());
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioManager::new(Box::new(NullAudio));
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }
}
