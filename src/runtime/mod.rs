use std::env;
use std::path::{Path, PathBuf};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Command};
use crate::player::RodioEngine;
use crate::store::TrackStore;

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let data_dir = settings.storage.data_dir.clone();
    let store = TrackStore::open_default(data_dir.as_deref())?;
    let engine = RodioEngine::new()?;

    let mut app = App::new(settings, store, Box::new(engine));
    if let Some(path) = theme_state_path(data_dir.as_deref()) {
        app = app.with_theme_path(path);
    }
    app.init();

    // Paths given on the command line are imported before the UI comes up.
    let import_paths: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();
    if !import_paths.is_empty() {
        app.dispatch(Command::ImportPaths(import_paths));
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

/// The theme preference lives next to the track database.
fn theme_state_path(data_dir_override: Option<&Path>) -> Option<PathBuf> {
    match data_dir_override {
        Some(dir) => Some(dir.join("state.toml")),
        None => dirs::data_dir().map(|dir| dir.join("rondo").join("state.toml")),
    }
}
