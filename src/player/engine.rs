//! The playback engine seam.

use std::time::Duration;

use thiserror::Error;

use crate::library::Track;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no usable audio output: {0}")]
    Output(#[from] ::rodio::StreamError),
    #[error("could not decode audio payload: {0}")]
    Decode(#[from] ::rodio::decoder::DecoderError),
}

/// One active audio stream.
///
/// Loading a track implicitly supersedes whatever was playing before; there
/// is no queueing or crossfade at this layer. Implementations retain the
/// last set volume across loads.
pub trait PlaybackEngine {
    /// Prepare `track` for playback, replacing the current stream. The new
    /// stream starts paused; call `play` to start it.
    fn load(&mut self, track: &Track) -> Result<(), EngineError>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Drop the current stream entirely.
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn seek(&mut self, position: Duration);
    fn position(&self) -> Duration;
    /// Total duration of the loaded stream; `None` until known.
    fn duration(&self) -> Option<Duration>;
    /// True once the loaded stream ran to natural completion.
    fn finished(&self) -> bool;
}

#[cfg(test)]
pub(crate) mod null {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::library::{Track, TrackId};

    use super::{EngineError, PlaybackEngine};

    /// Observable state of the test engine, shared with the test body.
    #[derive(Default)]
    pub struct NullState {
        pub loaded: Vec<TrackId>,
        pub playing: bool,
        pub stopped: bool,
        pub volume: f32,
        pub seeks: Vec<Duration>,
        pub position: Duration,
        pub duration: Option<Duration>,
        pub finished: bool,
    }

    pub type NullHandle = Arc<Mutex<NullState>>;

    /// Engine double that records calls instead of producing sound. The
    /// loaded track's own duration stands in for decoded stream metadata.
    pub struct NullEngine {
        state: NullHandle,
    }

    impl NullEngine {
        pub fn new() -> (Self, NullHandle) {
            let state: NullHandle = Arc::new(Mutex::new(NullState {
                volume: 1.0,
                ..NullState::default()
            }));
            (
                Self {
                    state: Arc::clone(&state),
                },
                state,
            )
        }
    }

    impl PlaybackEngine for NullEngine {
        fn load(&mut self, track: &Track) -> Result<(), EngineError> {
            let mut state = self.state.lock().unwrap();
            state.loaded.push(track.id.clone());
            state.playing = false;
            state.finished = false;
            state.position = Duration::ZERO;
            state.duration = track.duration;
            Ok(())
        }

        fn play(&mut self) {
            self.state.lock().unwrap().playing = true;
        }

        fn pause(&mut self) {
            self.state.lock().unwrap().playing = false;
        }

        fn stop(&mut self) {
            let mut state = self.state.lock().unwrap();
            state.playing = false;
            state.stopped = true;
            state.duration = None;
        }

        fn set_volume(&mut self, volume: f32) {
            self.state.lock().unwrap().volume = volume;
        }

        fn seek(&mut self, position: Duration) {
            let mut state = self.state.lock().unwrap();
            state.seeks.push(position);
            state.position = position;
        }

        fn position(&self) -> Duration {
            self.state.lock().unwrap().position
        }

        fn duration(&self) -> Option<Duration> {
            self.state.lock().unwrap().duration
        }

        fn finished(&self) -> bool {
            self.state.lock().unwrap().finished
        }
    }
}
