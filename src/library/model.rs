use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::warn;
use uuid::Uuid;

use crate::store::{StoreError, TrackStore};

use super::import::{self, ImportFile};
use super::samples;
use super::tags::TagExtractor;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Stable, opaque identifier for a track.
///
/// Assigned once at import and never reused. Every cross-view reference
/// (favorites, playlists, recent history) is keyed on the id rather than on
/// a list position, so library mutations can never silently retarget them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TrackId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for TrackId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Embedded cover art.
#[derive(Clone)]
pub struct Artwork {
    pub mime: String,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: Option<Duration>,
    pub artwork: Option<Artwork>,
    /// Original file bytes, shared so playable handles are cheap to derive.
    pub payload: Arc<[u8]>,
}

impl Track {
    /// Derive a fresh playable handle over the payload.
    ///
    /// Handles are session-local: hydrating from the store rebuilds the
    /// payload allocation, so a handle can never outlive the bytes it reads.
    pub fn reader(&self) -> Cursor<Arc<[u8]>> {
        Cursor::new(Arc::clone(&self.payload))
    }
}

/// The authoritative, insertion-ordered track list.
#[derive(Default)]
pub struct Library {
    tracks: Vec<Track>,
    by_id: HashMap<TrackId, usize>,
}

/// What startup hydration found: persisted tracks, or freshly seeded samples.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub restored: usize,
    pub seeded: usize,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn get_by_id(&self, id: &TrackId) -> Option<&Track> {
        self.index_of(id).and_then(|index| self.tracks.get(index))
    }

    fn push(&mut self, track: Track) -> usize {
        let index = self.tracks.len();
        self.by_id.insert(track.id.clone(), index);
        self.tracks.push(track);
        index
    }

    /// Import a batch of files: every file whose media type indicates audio
    /// becomes a new track (generated id, filename-derived title, placeholder
    /// artist/album, no duration yet), appended in order and written through
    /// to the store. Non-audio files are silently skipped.
    ///
    /// Returns the ids of the added tracks so the caller can enrich them.
    pub fn add_files(
        &mut self,
        store: &TrackStore,
        files: Vec<ImportFile>,
    ) -> Result<Vec<TrackId>, StoreError> {
        let mut added = Vec::new();
        for file in files {
            if !import::is_audio_media_type(&file.media_type) {
                continue;
            }
            let track = import::synthesize_track(file);
            let id = track.id.clone();
            let index = self.push(track);
            store.put(&self.tracks[index])?;
            added.push(id);
        }
        Ok(added)
    }

    /// Run the tag-extraction collaborator over a track's payload and apply
    /// whatever it recovered, re-persisting the record afterwards.
    ///
    /// Extraction failure is non-fatal: it is logged and the synthesized
    /// defaults are kept. Returns whether the track changed.
    pub fn enrich(
        &mut self,
        store: &TrackStore,
        extractor: &dyn TagExtractor,
        id: &TrackId,
    ) -> Result<bool, StoreError> {
        let Some(index) = self.index_of(id) else {
            return Ok(false);
        };

        let tags = match extractor.extract(&self.tracks[index].payload) {
            Ok(tags) => tags,
            Err(err) => {
                warn!(
                    "metadata extraction failed for \"{}\": {}",
                    self.tracks[index].title, err
                );
                return Ok(false);
            }
        };

        let track = &mut self.tracks[index];
        if let Some(title) = tags.title {
            track.title = title;
        }
        if let Some(artist) = tags.artist {
            track.artist = artist;
        }
        if let Some(album) = tags.album {
            track.album = album;
        }
        if let Some(artwork) = tags.artwork {
            track.artwork = Some(artwork);
        }
        if tags.duration.is_some() {
            track.duration = tags.duration;
        }

        store.put(&self.tracks[index])?;
        Ok(true)
    }

    /// Startup hydration: restore every persisted track, or seed the bundled
    /// samples when the store is empty. A missing sample file is skipped
    /// without failing the whole load; store failures propagate.
    pub fn load_from_store(
        &mut self,
        store: &TrackStore,
        sample_dir: &Path,
    ) -> Result<LoadReport, StoreError> {
        let restored = store.get_all()?;
        if !restored.is_empty() {
            let count = restored.len();
            for track in restored {
                self.push(track);
            }
            return Ok(LoadReport {
                restored: count,
                seeded: 0,
            });
        }

        let mut seeded = 0;
        for sample in samples::SAMPLE_TRACKS {
            let Some(bytes) = samples::read_sample(sample_dir, &sample) else {
                continue;
            };
            let index = self.push(samples::sample_track(&sample, bytes));
            store.put(&self.tracks[index])?;
            seeded += 1;
        }
        Ok(LoadReport {
            restored: 0,
            seeded,
        })
    }

    /// Wipe the store and the in-memory list. The store is cleared first; if
    /// that fails the list is left untouched so nothing disappears from view
    /// without having been deleted.
    pub fn clear(&mut self, store: &TrackStore) -> Result<(), StoreError> {
        store.clear()?;
        self.tracks.clear();
        self.by_id.clear();
        Ok(())
    }

    /// Test fixture: a library seeded without going through a store.
    #[cfg(test)]
    pub(crate) fn with_tracks(tracks: Vec<Track>) -> Self {
        let mut library = Library::new();
        for track in tracks {
            library.push(track);
        }
        library
    }

    /// Case-insensitive substring search over title, artist and album.
    /// An empty query lists the whole library.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return (0..self.tracks.len()).collect();
        }

        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| {
                track.title.to_lowercase().contains(&query)
                    || track.artist.to_lowercase().contains(&query)
                    || track.album.to_lowercase().contains(&query)
            })
            .map(|(index, _)| index)
            .collect()
    }
}
