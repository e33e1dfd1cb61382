//! `PlaybackEngine` backed by rodio.

use std::time::Duration;

use log::debug;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::library::Track;

use super::engine::{EngineError, PlaybackEngine};

pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    duration: Option<Duration>,
    volume: f32,
}

impl RodioEngine {
    pub fn new() -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            duration: None,
            volume: 1.0,
        })
    }
}

impl PlaybackEngine for RodioEngine {
    fn load(&mut self, track: &Track) -> Result<(), EngineError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let source = Decoder::new(track.reader())?;
        // Prefer the decoded stream's own duration; the tag-derived one is a
        // fallback for formats the decoder cannot size.
        self.duration = source.total_duration().or(track.duration);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        sink.pause();
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn seek(&mut self, position: Duration) {
        if let Some(sink) = &self.sink {
            if let Err(err) = sink.try_seek(position) {
                debug!("seek to {position:?} unsupported for current source: {err}");
            }
        }
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(Sink::get_pos)
            .unwrap_or(Duration::ZERO)
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn finished(&self) -> bool {
        self.sink.as_ref().map(Sink::empty).unwrap_or(false)
    }
}
