use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use walkdir::WalkDir;

use super::model::{Track, TrackId, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

/// One user-provided file, already read into memory.
pub struct ImportFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// The import contract filters on media type, not extension: anything that
/// is not `audio/*` is dropped.
pub fn is_audio_media_type(media_type: &str) -> bool {
    media_type.starts_with("audio/")
}

/// Map a file extension to a media type. Unknown extensions come back as a
/// generic binary type so the audio filter drops them.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("ogg" | "oga") => "audio/ogg",
        Some("m4a" | "mp4") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("opus") => "audio/opus",
        _ => "application/octet-stream",
    }
}

/// Default track title: the file name with its final extension stripped.
pub fn default_title(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Expand user-supplied paths into in-memory files. Directories are walked
/// recursively in file-name order; entries outside the configured extension
/// list and unreadable files are skipped with a log line.
pub fn read_paths(paths: &[PathBuf], extensions: &[String]) -> Vec<ImportFile> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                if entry.path().is_file() {
                    push_file(&mut files, entry.path(), extensions);
                }
            }
        } else {
            push_file(&mut files, path, extensions);
        }
    }
    files
}

fn push_file(files: &mut Vec<ImportFile>, path: &Path, extensions: &[String]) {
    if !has_listed_extension(path, extensions) {
        debug!("skipping non-library extension: {}", path.display());
        return;
    }

    match fs::read(path) {
        Ok(bytes) => {
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();
            files.push(ImportFile {
                name,
                media_type: media_type_for_path(path).to_string(),
                bytes,
            });
        }
        Err(err) => warn!("could not read {}: {}", path.display(), err),
    }
}

fn has_listed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions
                .iter()
                .any(|e| e.trim().trim_start_matches('.').eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Build a library track from an imported file: generated id, filename
/// title, placeholder artist/album, no duration until enrichment.
pub(super) fn synthesize_track(file: ImportFile) -> Track {
    Track {
        id: TrackId::random(),
        title: default_title(&file.name),
        artist: UNKNOWN_ARTIST.to_string(),
        album: UNKNOWN_ALBUM.to_string(),
        duration: None,
        artwork: None,
        payload: Arc::from(file.bytes),
    }
}
