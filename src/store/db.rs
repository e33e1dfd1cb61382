use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::{Connection, params};
use thiserror::Error;

use crate::library::{Artwork, Track, TrackId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine a data directory for this platform")]
    NoDataDir,
    #[error("could not prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Persistent track records, keyed by track id.
///
/// One table, one schema version. Opening creates the schema when absent and
/// is otherwise a no-op, so there is no migration path to maintain.
pub struct TrackStore {
    conn: Connection,
}

impl TrackStore {
    /// Open (or create) the store under the platform data directory, or
    /// under an explicit override from configuration.
    pub fn open_default(data_dir_override: Option<&Path>) -> Result<Self, StoreError> {
        let data_dir = match data_dir_override {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir().ok_or(StoreError::NoDataDir)?.join("rondo"),
        };

        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|source| StoreError::DataDir {
                path: data_dir.clone(),
                source,
            })?;
        }

        Self::open(&data_dir.join("library.db"))
    }

    /// Open (or create) a store at an explicit database path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tracks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                album TEXT NOT NULL,
                duration_ms INTEGER,
                artwork_mime TEXT,
                artwork BLOB,
                payload BLOB NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert or overwrite a record by id.
    ///
    /// The upsert keeps the original rowid, so re-persisting a track after
    /// metadata enrichment does not move it in `get_all` order.
    pub fn put(&self, track: &Track) -> Result<(), StoreError> {
        let duration_ms = track.duration.map(|d| d.as_millis() as i64);
        let (artwork_mime, artwork_data) = match &track.artwork {
            Some(artwork) => (Some(artwork.mime.as_str()), Some(artwork.data.as_slice())),
            None => (None, None),
        };

        self.conn.execute(
            "INSERT INTO tracks (id, title, artist, album, duration_ms, artwork_mime, artwork, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 artist = excluded.artist,
                 album = excluded.album,
                 duration_ms = excluded.duration_ms,
                 artwork_mime = excluded.artwork_mime,
                 artwork = excluded.artwork,
                 payload = excluded.payload",
            params![
                track.id.as_str(),
                track.title,
                track.artist,
                track.album,
                duration_ms,
                artwork_mime,
                artwork_data,
                &track.payload[..],
            ],
        )?;
        Ok(())
    }

    /// Every stored track, in insertion order.
    pub fn get_all(&self) -> Result<Vec<Track>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, artist, album, duration_ms, artwork_mime, artwork, payload
             FROM tracks ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let duration_ms: Option<i64> = row.get(4)?;
            let artwork_mime: Option<String> = row.get(5)?;
            let artwork_data: Option<Vec<u8>> = row.get(6)?;
            let payload: Vec<u8> = row.get(7)?;

            Ok(Track {
                id: TrackId::from(row.get::<_, String>(0)?),
                title: row.get(1)?,
                artist: row.get(2)?,
                album: row.get(3)?,
                duration: duration_ms.map(|ms| Duration::from_millis(ms as u64)),
                artwork: match (artwork_mime, artwork_data) {
                    (Some(mime), Some(data)) => Some(Artwork { mime, data }),
                    _ => None,
                },
                payload: Arc::from(payload),
            })
        })?;

        let mut tracks = Vec::new();
        for track in rows {
            tracks.push(track?);
        }
        Ok(tracks)
    }

    /// Remove every record. Irreversible.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM tracks", [])?;
        Ok(())
    }
}
