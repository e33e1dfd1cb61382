//! Playback controller and engine implementations.
//!
//! The controller is a small state machine over the [`PlaybackEngine`] seam;
//! the rodio-backed engine produces actual sound, while tests drive the
//! machine with a silent double.

mod controller;
mod engine;
mod rodio;

pub use controller::{PlaybackState, Player, RepeatMode};
pub use engine::{EngineError, PlaybackEngine};
pub use self::rodio::RodioEngine;

#[cfg(test)]
pub(crate) use engine::null::{NullEngine, NullHandle};

#[cfg(test)]
mod tests;
