//! Named track groupings.
//!
//! Playlists reference tracks by id, so library changes can never silently
//! retarget an entry; stale ids simply resolve to nothing at render time.

use thiserror::Error;
use uuid::Uuid;

use crate::library::TrackId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("playlist name cannot be empty")]
    EmptyName,
    #[error("playlist \"{0}\" already exists")]
    DuplicateName(String),
}

/// Outcome of an add-track request, for UI feedback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Clone, Debug)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: Vec<TrackId>,
}

#[derive(Default)]
pub struct Playlists {
    items: Vec<Playlist>,
}

impl Playlists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Playlist> {
        self.items.iter()
    }

    pub fn get(&self, playlist_id: &str) -> Option<&Playlist> {
        self.items.iter().find(|p| p.id == playlist_id)
    }

    /// Create an empty playlist. The name is trimmed, must be non-empty and
    /// must not collide case-insensitively with an existing playlist.
    pub fn create(&mut self, name: &str) -> Result<&Playlist, PlaylistError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlaylistError::EmptyName);
        }

        let lowered = name.to_lowercase();
        if self.items.iter().any(|p| p.name.to_lowercase() == lowered) {
            return Err(PlaylistError::DuplicateName(name.to_string()));
        }

        self.items.push(Playlist {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            tracks: Vec::new(),
        });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Append a track unless it is already a member. `None` means no such
    /// playlist exists.
    pub fn add_track(&mut self, playlist_id: &str, track: TrackId) -> Option<AddOutcome> {
        let playlist = self.items.iter_mut().find(|p| p.id == playlist_id)?;
        if playlist.tracks.contains(&track) {
            return Some(AddOutcome::AlreadyPresent);
        }
        playlist.tracks.push(track);
        Some(AddOutcome::Added)
    }

    /// Remove a playlist, returning it for the deletion notice. The explicit
    /// confirmation step is the caller's responsibility.
    pub fn delete(&mut self, playlist_id: &str) -> Option<Playlist> {
        let index = self.items.iter().position(|p| p.id == playlist_id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trims_and_stores_the_name() {
        let mut playlists = Playlists::new();
        let id = playlists.create("  Road Trip  ").unwrap().id.clone();
        assert_eq!(playlists.get(&id).unwrap().name, "Road Trip");
        assert_eq!(playlists.len(), 1);
    }

    #[test]
    fn create_rejects_empty_or_blank_names() {
        let mut playlists = Playlists::new();
        assert_eq!(playlists.create("").unwrap_err(), PlaylistError::EmptyName);
        assert_eq!(playlists.create("   ").unwrap_err(), PlaylistError::EmptyName);
        assert!(playlists.is_empty());
    }

    #[test]
    fn create_rejects_case_insensitive_duplicates() {
        let mut playlists = Playlists::new();
        playlists.create("Road Trip").unwrap();

        assert_eq!(
            playlists.create("road trip").unwrap_err(),
            PlaylistError::DuplicateName("road trip".to_string())
        );
        assert_eq!(playlists.len(), 1);
    }

    #[test]
    fn add_track_appends_once_and_reports_duplicates() {
        let mut playlists = Playlists::new();
        let id = playlists.create("Mix").unwrap().id.clone();

        let track = TrackId::from("track-1");
        assert_eq!(playlists.add_track(&id, track.clone()), Some(AddOutcome::Added));
        assert_eq!(
            playlists.add_track(&id, track.clone()),
            Some(AddOutcome::AlreadyPresent)
        );
        assert_eq!(playlists.get(&id).unwrap().tracks, vec![track]);

        assert_eq!(playlists.add_track("missing", TrackId::from("track-2")), None);
    }

    #[test]
    fn delete_removes_and_returns_the_playlist() {
        let mut playlists = Playlists::new();
        let id = playlists.create("Old").unwrap().id.clone();

        let removed = playlists.delete(&id).unwrap();
        assert_eq!(removed.name, "Old");
        assert!(playlists.is_empty());
        assert!(playlists.delete(&id).is_none());
    }
}
