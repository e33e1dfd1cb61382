//! Track model and the in-memory library.
//!
//! `Library` owns the insertion-ordered track list that every view renders
//! from; file import, tag enrichment and sample seeding live in the
//! submodules.

mod import;
mod model;
mod samples;
mod tags;

pub use import::{ImportFile, default_title, is_audio_media_type, media_type_for_path, read_paths};
pub use model::{Artwork, Library, LoadReport, Track, TrackId, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
pub use samples::{SAMPLE_TRACKS, SampleTrack};
pub use tags::{ExtractedTags, LoftyExtractor, TagError, TagExtractor};
