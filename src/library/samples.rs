//! Bundled starter content used to seed an empty library.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;

use super::model::{Track, TrackId, UNKNOWN_ALBUM};

/// One bundled sample: fixed display metadata plus a file name resolved
/// against the configured sample directory.
#[derive(Copy, Clone)]
pub struct SampleTrack {
    pub title: &'static str,
    pub artist: &'static str,
    pub file: &'static str,
}

pub const SAMPLE_TRACKS: [SampleTrack; 3] = [
    SampleTrack {
        title: "Midnight Dreams",
        artist: "Ethereal Sounds",
        file: "sample1.mp3",
    },
    SampleTrack {
        title: "Neon Lights",
        artist: "Cyber Wave",
        file: "sample2.mp3",
    },
    SampleTrack {
        title: "Ocean Breeze",
        artist: "Ambient Flow",
        file: "sample3.mp3",
    },
];

/// Read one sample from disk. Sample content is optional, so a miss is only
/// logged.
pub(super) fn read_sample(dir: &Path, sample: &SampleTrack) -> Option<Vec<u8>> {
    let path = dir.join(sample.file);
    match fs::read(&path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            info!("sample track {} not found: {}", path.display(), err);
            None
        }
    }
}

pub(super) fn sample_track(sample: &SampleTrack, bytes: Vec<u8>) -> Track {
    Track {
        id: TrackId::random(),
        title: sample.title.to_string(),
        artist: sample.artist.to_string(),
        album: UNKNOWN_ALBUM.to_string(),
        duration: None,
        artwork: None,
        payload: Arc::from(bytes),
    }
}
