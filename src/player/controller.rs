use std::time::Duration;

use rand::RngExt;

use crate::library::{Library, TrackId};

use super::engine::{EngineError, PlaybackEngine};

/// The controller's view of the engine: nothing loaded, or a loaded stream
/// that is paused or playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Paused,
    Playing,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    /// Cycle `Off -> All -> One -> Off`.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Playback state machine over a single engine.
///
/// The player holds the session flags (shuffle, repeat, volume, mute) and
/// the current library index; it never touches the history or the views
/// itself, it only reports which track started so the composition root can.
pub struct Player {
    engine: Box<dyn PlaybackEngine>,
    current: Option<usize>,
    state: PlaybackState,
    shuffle: bool,
    repeat: RepeatMode,
    volume: f32,
    muted: bool,
}

impl Player {
    pub fn new(engine: Box<dyn PlaybackEngine>) -> Self {
        Self {
            engine,
            current: None,
            state: PlaybackState::Idle,
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: 1.0,
            muted: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Load and start the track at `index`, superseding the current stream.
    /// Out-of-range indices are ignored. Returns the id of the track that
    /// started, which the caller records as a recent play.
    pub fn play_track(
        &mut self,
        library: &Library,
        index: usize,
    ) -> Result<Option<TrackId>, EngineError> {
        let Some(track) = library.get(index) else {
            return Ok(None);
        };

        self.engine.load(track)?;
        self.engine.play();
        self.current = Some(index);
        self.state = PlaybackState::Playing;
        Ok(Some(track.id.clone()))
    }

    /// Idle starts the first track; otherwise flips pause/resume. A no-op on
    /// an empty library.
    pub fn toggle_play(&mut self, library: &Library) -> Result<Option<TrackId>, EngineError> {
        if library.is_empty() {
            return Ok(None);
        }

        match self.state {
            PlaybackState::Idle => self.play_track(library, 0),
            PlaybackState::Paused => {
                self.engine.play();
                self.state = PlaybackState::Playing;
                Ok(None)
            }
            PlaybackState::Playing => {
                self.engine.pause();
                self.state = PlaybackState::Paused;
                Ok(None)
            }
        }
    }

    pub fn next_track(&mut self, library: &Library) -> Result<Option<TrackId>, EngineError> {
        if library.is_empty() {
            return Ok(None);
        }
        let next = self.next_index(library.len());
        self.play_track(library, next)
    }

    pub fn previous_track(&mut self, library: &Library) -> Result<Option<TrackId>, EngineError> {
        if library.is_empty() {
            return Ok(None);
        }
        let previous = self.previous_index(library.len());
        self.play_track(library, previous)
    }

    // Shuffle picks uniformly at random and may land on the current track.
    fn next_index(&self, len: usize) -> usize {
        if self.shuffle {
            rand::rng().random_range(0..len)
        } else {
            let current = self.current.unwrap_or(0);
            if current + 1 >= len { 0 } else { current + 1 }
        }
    }

    fn previous_index(&self, len: usize) -> usize {
        if self.shuffle {
            rand::rng().random_range(0..len)
        } else {
            let current = self.current.unwrap_or(0);
            if current == 0 { len - 1 } else { current - 1 }
        }
    }

    /// Advance policy for natural completion: repeat-one restarts in place
    /// (without re-recording a recent play), repeat-all always advances, and
    /// repeat-off parks on the last track unless shuffle keeps going.
    pub fn handle_track_end(&mut self, library: &Library) -> Result<Option<TrackId>, EngineError> {
        match self.repeat {
            RepeatMode::One => {
                if let Some(index) = self.current {
                    self.play_track(library, index)?;
                }
                Ok(None)
            }
            RepeatMode::All => self.next_track(library),
            RepeatMode::Off => {
                let at_last = self
                    .current
                    .is_none_or(|index| index + 1 >= library.len());
                if at_last && !self.shuffle {
                    self.engine.pause();
                    self.state = PlaybackState::Paused;
                    Ok(None)
                } else {
                    self.next_track(library)
                }
            }
        }
    }

    /// Drive auto-advance from the event loop: acts only when a playing
    /// stream reports natural completion.
    pub fn poll_finished(&mut self, library: &Library) -> Result<Option<TrackId>, EngineError> {
        if self.state == PlaybackState::Playing && self.engine.finished() {
            self.handle_track_end(library)
        } else {
            Ok(None)
        }
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    /// Set an absolute volume: clamps to [0, 1] and always un-mutes.
    pub fn set_volume_level(&mut self, level: f32) {
        self.muted = false;
        self.volume = level.clamp(0.0, 1.0);
        self.apply_volume();
    }

    /// Relative volume change (keyboard/scroll nudges): the new absolute
    /// level is computed from the current one before clamping.
    pub fn nudge_volume(&mut self, delta: f32) {
        self.set_volume_level(self.volume + delta);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.apply_volume();
        self.muted
    }

    fn apply_volume(&mut self) {
        let effective = if self.muted { 0.0 } else { self.volume };
        self.engine.set_volume(effective);
    }

    /// Seek to a fraction of the loaded stream. A no-op until the engine
    /// knows its duration.
    pub fn seek_to(&mut self, fraction: f64) {
        let Some(total) = self.engine.duration() else {
            return;
        };
        let fraction = fraction.clamp(0.0, 1.0);
        self.engine.seek(total.mul_f64(fraction));
    }

    /// Current playback position and total duration, for progress display.
    pub fn progress(&self) -> (Duration, Option<Duration>) {
        (self.engine.position(), self.engine.duration())
    }

    /// Drop the loaded stream and return to `Idle`.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.current = None;
        self.state = PlaybackState::Idle;
    }
}
