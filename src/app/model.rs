use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::config::{RepeatSetting, Settings};
use crate::favorites::Favorites;
use crate::history::History;
use crate::library::{ImportFile, Library, LoftyExtractor, TagExtractor, TrackId, read_paths};
use crate::notify::{Notice, Notices};
use crate::player::{EngineError, PlaybackEngine, Player, RepeatMode};
use crate::playlists::{AddOutcome, PlaylistError, Playlists};
use crate::store::TrackStore;
use crate::theme::{self, Theme};

use super::command::Command;

/// The application state: one store, the four state managers, the playback
/// controller and the notice queue, wired together behind `dispatch`.
pub struct App {
    pub store: TrackStore,
    pub library: Library,
    pub playlists: Playlists,
    pub favorites: Favorites,
    pub history: History,
    pub player: Player,
    pub notices: Notices,
    pub theme: Theme,
    pub settings: Settings,
    theme_path: Option<PathBuf>,
    extractor: Box<dyn TagExtractor>,
}

impl App {
    pub fn new(settings: Settings, store: TrackStore, engine: Box<dyn PlaybackEngine>) -> Self {
        Self {
            store,
            library: Library::new(),
            playlists: Playlists::new(),
            favorites: Favorites::new(),
            history: History::new(),
            player: Player::new(engine),
            notices: Notices::default(),
            theme: Theme::default(),
            settings,
            theme_path: None,
            extractor: Box::new(LoftyExtractor),
        }
    }

    /// Replace the tag extractor (tests use a canned one).
    pub fn with_extractor(mut self, extractor: Box<dyn TagExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Attach the theme state file and load the persisted preference.
    pub fn with_theme_path(mut self, path: PathBuf) -> Self {
        self.theme = theme::load(&path);
        self.theme_path = Some(path);
        self
    }

    /// Startup: apply configured playback defaults, then restore persisted
    /// tracks or seed the bundled samples.
    pub fn init(&mut self) {
        self.player.set_shuffle(self.settings.playback.shuffle);
        self.player.set_repeat(match self.settings.playback.repeat {
            RepeatSetting::Off => RepeatMode::Off,
            RepeatSetting::All => RepeatMode::All,
            RepeatSetting::One => RepeatMode::One,
        });

        let sample_dir = self.settings.library.sample_dir.clone();
        match self.library.load_from_store(&self.store, &sample_dir) {
            Ok(report) if report.restored > 0 => {
                self.notices.push(Notice::success(format!(
                    "{} tracks loaded from your library.",
                    report.restored
                )));
            }
            Ok(report) if report.seeded > 0 => {
                self.notices
                    .push(Notice::info("Added sample tracks to get you started."));
            }
            Ok(_) => {}
            Err(err) => {
                self.notices
                    .push(Notice::error(format!("Could not load your library: {err}")));
            }
        }
    }

    /// Single entry point for every front-end originated mutation.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::ImportPaths(paths) => {
                let files = read_paths(&paths, &self.settings.library.extensions);
                self.import_files(files);
            }
            Command::ImportFiles(files) => self.import_files(files),
            Command::PlayTrack(index) => {
                self.play_and_record(|player, library| player.play_track(library, index));
            }
            Command::TogglePlay => {
                self.play_and_record(|player, library| player.toggle_play(library));
            }
            Command::NextTrack => {
                self.play_and_record(|player, library| player.next_track(library));
            }
            Command::PreviousTrack => {
                self.play_and_record(|player, library| player.previous_track(library));
            }
            Command::ToggleShuffle => {
                self.player.toggle_shuffle();
            }
            Command::CycleRepeat => {
                self.player.cycle_repeat();
            }
            Command::SetVolume(level) => self.player.set_volume_level(level),
            Command::NudgeVolume(delta) => self.player.nudge_volume(delta),
            Command::ToggleMute => {
                self.player.toggle_mute();
            }
            Command::SeekTo(fraction) => self.player.seek_to(fraction),
            Command::ToggleFavorite(index) => self.toggle_favorite(index),
            Command::CreatePlaylist(name) => self.create_playlist(&name),
            Command::DeletePlaylist(playlist_id) => self.delete_playlist(&playlist_id),
            Command::AddToPlaylist { playlist_id, track } => {
                self.add_to_playlist(&playlist_id, track);
            }
            Command::ClearLibrary => self.clear_library(),
            Command::ToggleTheme => self.toggle_theme(),
        }
    }

    /// Poll for natural track completion; called from the event loop.
    pub fn tick(&mut self) {
        self.play_and_record(|player, library| player.poll_finished(library));
    }

    fn play_and_record<F>(&mut self, operation: F)
    where
        F: FnOnce(&mut Player, &Library) -> Result<Option<TrackId>, EngineError>,
    {
        match operation(&mut self.player, &self.library) {
            Ok(Some(id)) => self.history.record(id),
            Ok(None) => {}
            Err(err) => self
                .notices
                .push(Notice::error(format!("Playback failed: {err}"))),
        }
    }

    fn import_files(&mut self, files: Vec<ImportFile>) {
        let added = match self.library.add_files(&self.store, files) {
            Ok(ids) => ids,
            Err(err) => {
                self.notices
                    .push(Notice::error(format!("Could not save tracks: {err}")));
                return;
            }
        };
        if added.is_empty() {
            return;
        }

        self.notices.push(Notice::success(format!(
            "{} track(s) added to your library.",
            added.len()
        )));

        for id in &added {
            if let Err(err) = self.library.enrich(&self.store, self.extractor.as_ref(), id) {
                warn!("could not re-persist enriched metadata: {err}");
                self.notices.push(Notice::error(format!(
                    "Could not save track metadata: {err}"
                )));
            }
        }
    }

    fn toggle_favorite(&mut self, index: usize) {
        let Some(track) = self.library.get(index) else {
            return;
        };
        let id = track.id.clone();
        let title = track.title.clone();

        if self.favorites.toggle(id) {
            self.notices
                .push(Notice::success(format!("Added \"{title}\" to Favorites.")));
        } else {
            self.notices
                .push(Notice::info(format!("Removed \"{title}\" from Favorites.")));
        }
    }

    fn create_playlist(&mut self, name: &str) {
        match self.playlists.create(name) {
            Ok(playlist) => {
                let notice = Notice::success(format!("Playlist \"{}\" created.", playlist.name));
                self.notices.push(notice);
            }
            Err(PlaylistError::EmptyName) => {
                self.notices
                    .push(Notice::error("Playlist name cannot be empty!"));
            }
            Err(PlaylistError::DuplicateName(name)) => {
                self.notices
                    .push(Notice::error(format!("Playlist \"{name}\" already exists!")));
            }
        }
    }

    fn delete_playlist(&mut self, playlist_id: &str) {
        if let Some(removed) = self.playlists.delete(playlist_id) {
            self.notices
                .push(Notice::info(format!("Playlist \"{}\" deleted.", removed.name)));
        }
    }

    fn add_to_playlist(&mut self, playlist_id: &str, index: usize) {
        let Some(track) = self.library.get(index) else {
            return;
        };
        let id = track.id.clone();
        let title = track.title.clone();

        let Some(outcome) = self.playlists.add_track(playlist_id, id) else {
            return;
        };
        let Some(playlist) = self.playlists.get(playlist_id) else {
            return;
        };
        match outcome {
            AddOutcome::Added => self.notices.push(Notice::success(format!(
                "Added \"{title}\" to \"{}\".",
                playlist.name
            ))),
            AddOutcome::AlreadyPresent => self.notices.push(Notice::info(format!(
                "Track is already in \"{}\".",
                playlist.name
            ))),
        }
    }

    /// Wipe the store and every session structure referencing it. On a store
    /// failure the state is left as it was, apart from the error notice.
    fn clear_library(&mut self) {
        if let Err(err) = self.library.clear(&self.store) {
            self.notices
                .push(Notice::error(format!("Could not clear library: {err}")));
            return;
        }

        self.player.stop();
        self.playlists.clear();
        self.favorites.clear();
        self.history.clear();
        self.notices
            .push(Notice::info("Library cleared.").lasting(Duration::from_secs(4)));
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        if let Some(path) = &self.theme_path {
            if let Err(err) = theme::save(path, self.theme) {
                warn!("could not persist theme preference: {err}");
            }
        }
    }
}
