use std::path::PathBuf;

use crate::library::ImportFile;

/// Every state mutation the front-end can request.
pub enum Command {
    /// Read the given paths (files or directories) and import the audio ones.
    ImportPaths(Vec<PathBuf>),
    /// Import already-read files (drag-and-drop style batches, tests).
    ImportFiles(Vec<ImportFile>),
    PlayTrack(usize),
    TogglePlay,
    NextTrack,
    PreviousTrack,
    ToggleShuffle,
    CycleRepeat,
    SetVolume(f32),
    NudgeVolume(f32),
    ToggleMute,
    SeekTo(f64),
    ToggleFavorite(usize),
    CreatePlaylist(String),
    /// Remove a playlist. The front-end runs the confirmation step first.
    DeletePlaylist(String),
    AddToPlaylist { playlist_id: String, track: usize },
    /// Wipe the store and every session structure. Confirmed by the
    /// front-end before dispatching; irreversible.
    ClearLibrary,
    ToggleTheme,
}
