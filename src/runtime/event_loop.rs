use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Command};
use crate::notify::Notice;
use crate::ui::{self, Prompt, View, ViewContext};

/// The footer interaction in flight, if any.
enum Mode {
    Normal,
    Search,
    NewPlaylist,
    ImportPath,
    ConfirmClear,
    ConfirmDeletePlaylist(String),
    ChoosePlaylist { track: usize },
}

/// State tracked by the runtime event loop across iterations.
struct LoopState {
    view: View,
    selected: usize,
    open_playlist: Option<String>,
    mode: Mode,
    input: String,
    query: String,
    chooser_selected: usize,
    notice: Option<(Notice, Instant)>,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            view: View::Library,
            selected: 0,
            open_playlist: None,
            mode: Mode::Normal,
            input: String::new(),
            query: String::new(),
            chooser_selected: 0,
            notice: None,
        }
    }
}

/// Main terminal event loop: polls for track completion, drains notices,
/// draws, and maps key presses onto app commands. Returns when the user
/// quits.
pub(super) fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = LoopState::default();

    loop {
        app.tick();
        refresh_notice(app, &mut state);

        let rows = ui::view_rows(app, state.view, &state.query, state.open_playlist.as_deref());
        clamp_selection(app, &mut state, &rows);

        let prompt = build_prompt(app, &state);
        let ctx = ViewContext {
            view: state.view,
            rows: &rows,
            selected: state.selected,
            open_playlist: state.open_playlist.as_deref(),
            query: &state.query,
            notice: state.notice.as_ref().map(|(notice, _)| notice),
            prompt,
        };
        terminal.draw(|frame| ui::draw(frame, app, &ctx))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, &mut state, &rows, key.code) {
                    return Ok(());
                }
            }
        }
    }
}

/// Rows in the main pane: the playlists root lists playlists, every other
/// pane lists tracks.
fn pane_len(app: &App, state: &LoopState, rows: &[usize]) -> usize {
    if state.view == View::Playlists && state.open_playlist.is_none() {
        app.playlists.len()
    } else {
        rows.len()
    }
}

fn clamp_selection(app: &App, state: &mut LoopState, rows: &[usize]) {
    let len = pane_len(app, state, rows);
    state.selected = if len == 0 {
        0
    } else {
        state.selected.min(len - 1)
    };
}

fn refresh_notice(app: &mut App, state: &mut LoopState) {
    if let Some((_, deadline)) = &state.notice {
        if Instant::now() >= *deadline {
            state.notice = None;
        }
    }
    if state.notice.is_none() {
        if let Some(notice) = app.notices.pop() {
            let deadline = Instant::now() + notice.duration;
            state.notice = Some((notice, deadline));
        }
    }
}

fn build_prompt<'a>(app: &'a App, state: &'a LoopState) -> Prompt<'a> {
    match &state.mode {
        Mode::Normal => Prompt::None,
        Mode::Search => Prompt::Input {
            label: "Search",
            value: &state.input,
        },
        Mode::NewPlaylist => Prompt::Input {
            label: "New playlist name",
            value: &state.input,
        },
        Mode::ImportPath => Prompt::Input {
            label: "Import path",
            value: &state.input,
        },
        Mode::ConfirmClear => Prompt::Confirm {
            question: "Delete all tracks from your library? This cannot be undone.".to_string(),
        },
        Mode::ConfirmDeletePlaylist(playlist_id) => {
            let name = app
                .playlists
                .get(playlist_id)
                .map(|p| p.name.clone())
                .unwrap_or_default();
            Prompt::Confirm {
                question: format!("Delete playlist \"{name}\"? This cannot be undone."),
            }
        }
        Mode::ChoosePlaylist { .. } => Prompt::Chooser {
            title: " Add to... ".to_string(),
            items: app.playlists.iter().map(|p| p.name.clone()).collect(),
            selected: state.chooser_selected,
        },
    }
}

/// Handle one key press. Returns true when the app should quit.
fn handle_key(app: &mut App, state: &mut LoopState, rows: &[usize], code: KeyCode) -> bool {
    let mode = std::mem::replace(&mut state.mode, Mode::Normal);
    match mode {
        Mode::Normal => return handle_normal_key(app, state, rows, code),

        Mode::Search => match code {
            KeyCode::Esc => {
                state.query.clear();
                state.input.clear();
            }
            KeyCode::Enter => {}
            KeyCode::Backspace => {
                state.input.pop();
                state.query = state.input.clone();
                state.mode = Mode::Search;
            }
            KeyCode::Char(c) if !c.is_control() => {
                state.input.push(c);
                state.query = state.input.clone();
                state.mode = Mode::Search;
            }
            _ => state.mode = Mode::Search,
        },

        Mode::NewPlaylist => match code {
            KeyCode::Esc => state.input.clear(),
            KeyCode::Enter => {
                let name = std::mem::take(&mut state.input);
                app.dispatch(Command::CreatePlaylist(name));
            }
            KeyCode::Backspace => {
                state.input.pop();
                state.mode = Mode::NewPlaylist;
            }
            KeyCode::Char(c) if !c.is_control() => {
                state.input.push(c);
                state.mode = Mode::NewPlaylist;
            }
            _ => state.mode = Mode::NewPlaylist,
        },

        Mode::ImportPath => match code {
            KeyCode::Esc => state.input.clear(),
            KeyCode::Enter => {
                let path = std::mem::take(&mut state.input);
                if !path.trim().is_empty() {
                    app.dispatch(Command::ImportPaths(vec![PathBuf::from(path.trim())]));
                }
            }
            KeyCode::Backspace => {
                state.input.pop();
                state.mode = Mode::ImportPath;
            }
            KeyCode::Char(c) if !c.is_control() => {
                state.input.push(c);
                state.mode = Mode::ImportPath;
            }
            _ => state.mode = Mode::ImportPath,
        },

        Mode::ConfirmClear => {
            if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                app.dispatch(Command::ClearLibrary);
                state.open_playlist = None;
                state.query.clear();
                state.selected = 0;
            }
        }

        Mode::ConfirmDeletePlaylist(playlist_id) => {
            if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                if state.open_playlist.as_deref() == Some(playlist_id.as_str()) {
                    state.open_playlist = None;
                }
                app.dispatch(Command::DeletePlaylist(playlist_id));
            }
        }

        Mode::ChoosePlaylist { track } => match code {
            KeyCode::Esc => {}
            KeyCode::Char('j') | KeyCode::Down => {
                if state.chooser_selected + 1 < app.playlists.len() {
                    state.chooser_selected += 1;
                }
                state.mode = Mode::ChoosePlaylist { track };
            }
            KeyCode::Char('k') | KeyCode::Up => {
                state.chooser_selected = state.chooser_selected.saturating_sub(1);
                state.mode = Mode::ChoosePlaylist { track };
            }
            KeyCode::Enter => {
                let playlist_id = app
                    .playlists
                    .iter()
                    .nth(state.chooser_selected)
                    .map(|playlist| playlist.id.clone());
                if let Some(playlist_id) = playlist_id {
                    app.dispatch(Command::AddToPlaylist {
                        playlist_id,
                        track,
                    });
                }
            }
            _ => state.mode = Mode::ChoosePlaylist { track },
        },
    }
    false
}

fn handle_normal_key(app: &mut App, state: &mut LoopState, rows: &[usize], code: KeyCode) -> bool {
    let volume_step = app.settings.controls.volume_step;
    let seek_step = app.settings.controls.seek_step;
    let on_tracks = !(state.view == View::Playlists && state.open_playlist.is_none());

    match code {
        KeyCode::Char('q') => return true,

        KeyCode::Char('1') => switch_view(state, View::Library),
        KeyCode::Char('2') => switch_view(state, View::Playlists),
        KeyCode::Char('3') => switch_view(state, View::Favorites),
        KeyCode::Char('4') => switch_view(state, View::Recent),

        KeyCode::Char('j') | KeyCode::Down => move_selection(app, state, rows, 1),
        KeyCode::Char('k') | KeyCode::Up => move_selection(app, state, rows, -1),

        KeyCode::Enter => {
            if on_tracks {
                if let Some(&index) = rows.get(state.selected) {
                    app.dispatch(Command::PlayTrack(index));
                }
            } else if let Some(playlist) = app.playlists.iter().nth(state.selected) {
                state.open_playlist = Some(playlist.id.clone());
                state.selected = 0;
            }
        }
        KeyCode::Esc | KeyCode::Backspace => {
            if state.open_playlist.is_some() {
                state.open_playlist = None;
                state.selected = 0;
            } else if !state.query.is_empty() {
                state.query.clear();
            }
        }

        KeyCode::Char(' ') | KeyCode::Char('p') => app.dispatch(Command::TogglePlay),
        KeyCode::Char('l') => app.dispatch(Command::NextTrack),
        KeyCode::Char('h') => app.dispatch(Command::PreviousTrack),
        KeyCode::Char('s') => app.dispatch(Command::ToggleShuffle),
        KeyCode::Char('r') => app.dispatch(Command::CycleRepeat),
        KeyCode::Char('m') => app.dispatch(Command::ToggleMute),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.dispatch(Command::NudgeVolume(volume_step));
        }
        KeyCode::Char('-') => app.dispatch(Command::NudgeVolume(-volume_step)),
        KeyCode::Right => seek_nudge(app, seek_step),
        KeyCode::Left => seek_nudge(app, -seek_step),

        KeyCode::Char('f') => {
            if on_tracks {
                if let Some(&index) = rows.get(state.selected) {
                    app.dispatch(Command::ToggleFavorite(index));
                }
            }
        }
        KeyCode::Char('a') => {
            if on_tracks {
                if let Some(&index) = rows.get(state.selected) {
                    if app.playlists.is_empty() {
                        app.notices.push(Notice::info("No playlists yet."));
                    } else {
                        state.chooser_selected = 0;
                        state.mode = Mode::ChoosePlaylist { track: index };
                    }
                }
            }
        }
        KeyCode::Char('n') => {
            state.input.clear();
            state.mode = Mode::NewPlaylist;
        }
        KeyCode::Char('d') => {
            if !on_tracks {
                if let Some(playlist) = app.playlists.iter().nth(state.selected) {
                    state.mode = Mode::ConfirmDeletePlaylist(playlist.id.clone());
                }
            }
        }
        KeyCode::Char('o') => {
            state.input.clear();
            state.mode = Mode::ImportPath;
        }
        KeyCode::Char('/') => {
            // Searching always lands in the library view.
            state.view = View::Library;
            state.open_playlist = None;
            state.input = state.query.clone();
            state.mode = Mode::Search;
        }
        KeyCode::Char('t') => app.dispatch(Command::ToggleTheme),
        KeyCode::Char('x') => state.mode = Mode::ConfirmClear,

        _ => {}
    }
    false
}

fn switch_view(state: &mut LoopState, view: View) {
    state.view = view;
    state.selected = 0;
    state.open_playlist = None;
    state.query.clear();
}

fn move_selection(app: &App, state: &mut LoopState, rows: &[usize], delta: isize) {
    let len = pane_len(app, state, rows);
    if len == 0 {
        return;
    }
    let len = len as isize;
    state.selected = ((state.selected as isize + delta).rem_euclid(len)) as usize;
}

/// Relative seek: compute the new fraction from the current position. No-op
/// until the engine knows its duration.
fn seek_nudge(app: &mut App, delta: f64) {
    let (position, total) = app.player.progress();
    let Some(total) = total else {
        return;
    };
    if total.is_zero() {
        return;
    }
    let fraction = position.as_secs_f64() / total.as_secs_f64() + delta;
    app.dispatch(Command::SeekTo(fraction));
}
