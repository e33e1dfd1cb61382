//! Tag-extraction collaborator: recovers title/artist/album, cover art and
//! duration from a track's byte payload.

use std::io::Cursor;
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::MimeType;
use lofty::prelude::Accessor;
use lofty::probe::Probe;
use lofty::tag::Tag;
use thiserror::Error;

use super::model::Artwork;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("could not inspect audio payload: {0}")]
    Inspect(#[from] std::io::Error),
    #[error("unreadable tag data: {0}")]
    Parse(#[from] lofty::error::LoftyError),
}

/// Metadata recovered from embedded tags. `None` fields keep the track's
/// synthesized defaults.
#[derive(Default)]
pub struct ExtractedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub artwork: Option<Artwork>,
    pub duration: Option<Duration>,
}

pub trait TagExtractor {
    fn extract(&self, payload: &[u8]) -> Result<ExtractedTags, TagError>;
}

/// Production extractor backed by `lofty`. Imported payloads carry no
/// trustworthy file extension, so the file type is probed from content.
pub struct LoftyExtractor;

impl TagExtractor for LoftyExtractor {
    fn extract(&self, payload: &[u8]) -> Result<ExtractedTags, TagError> {
        let tagged = Probe::new(Cursor::new(payload)).guess_file_type()?.read()?;

        let mut extracted = ExtractedTags {
            duration: Some(tagged.properties().duration()),
            ..ExtractedTags::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            extracted.title = non_empty(tag.title().map(|v| v.into_owned()));
            extracted.artist = non_empty(tag.artist().map(|v| v.into_owned()));
            extracted.album = non_empty(tag.album().map(|v| v.into_owned()));
            extracted.artwork = first_picture(tag);
        }

        Ok(extracted)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_picture(tag: &Tag) -> Option<Artwork> {
    tag.pictures().first().map(|picture| Artwork {
        mime: picture
            .mime_type()
            .map(MimeType::as_str)
            .unwrap_or("application/octet-stream")
            .to_string(),
        data: picture.data().to_vec(),
    })
}
