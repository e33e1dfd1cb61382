//! Application composition root and the command dispatch.
//!
//! `App` owns the store, the four state managers and the playback
//! controller; the front-end drives it exclusively through [`Command`]
//! values, so the whole core can be exercised without a rendering surface.

mod command;
mod model;

pub use command::Command;
pub use model::App;
