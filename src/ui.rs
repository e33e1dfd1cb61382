//! UI rendering for the terminal front-end.
//!
//! Pure view code: everything here reads `App` state and the per-frame
//! [`ViewContext`] the event loop assembles; nothing is mutated.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::notify::{Notice, Severity};
use crate::player::{PlaybackState, RepeatMode};
use crate::theme::Theme;

/// Which list the main pane is showing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Library,
    Playlists,
    Favorites,
    Recent,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Library => "Your Library",
            View::Playlists => "Your Playlists",
            View::Favorites => "Your Favorites",
            View::Recent => "Recently Played",
        }
    }
}

/// The footer prompt, when an interaction is in flight.
pub enum Prompt<'a> {
    None,
    Input { label: &'a str, value: &'a str },
    Confirm { question: String },
    Chooser {
        title: String,
        items: Vec<String>,
        selected: usize,
    },
}

/// Per-frame state handed over by the event loop.
pub struct ViewContext<'a> {
    pub view: View,
    /// Library indices of the listed tracks (empty on the playlists root).
    pub rows: &'a [usize],
    pub selected: usize,
    /// Open playlist id when drilled into one.
    pub open_playlist: Option<&'a str>,
    pub query: &'a str,
    pub notice: Option<&'a Notice>,
    pub prompt: Prompt<'a>,
}

/// Compute the library indices a view lists. Stale ids (history or playlist
/// entries whose track is gone) drop out here rather than erroring.
pub fn view_rows(app: &App, view: View, query: &str, open_playlist: Option<&str>) -> Vec<usize> {
    match view {
        View::Library => app.library.search(query),
        View::Favorites => (0..app.library.len())
            .filter(|&index| {
                app.library
                    .get(index)
                    .map(|track| app.favorites.contains(&track.id))
                    .unwrap_or(false)
            })
            .collect(),
        View::Recent => app
            .history
            .entries()
            .iter()
            .filter_map(|id| app.library.index_of(id))
            .collect(),
        View::Playlists => match open_playlist {
            Some(playlist_id) => app
                .playlists
                .get(playlist_id)
                .map(|playlist| {
                    playlist
                        .tracks
                        .iter()
                        .filter_map(|id| app.library.index_of(id))
                        .collect()
                })
                .unwrap_or_default(),
            None => Vec::new(),
        },
    }
}

fn accent(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Cyan,
        Theme::Light => Color::Blue,
    }
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Info => Color::Blue,
    }
}

fn header_tabs(current: View, theme: Theme) -> Line<'static> {
    let tabs = [
        (View::Library, "[1] Library"),
        (View::Playlists, "[2] Playlists"),
        (View::Favorites, "[3] Favorites"),
        (View::Recent, "[4] Recent"),
    ];

    let mut spans: Vec<Span> = Vec::new();
    for (view, label) in tabs {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        if view == current {
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(accent(theme))
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(label));
        }
    }
    Line::from(spans)
}

fn status_lines(app: &App) -> Vec<Line<'static>> {
    let mut song = String::from("Stopped");
    if let Some(index) = app.player.current() {
        if let Some(track) = app.library.get(index) {
            let (elapsed, total) = app.player.progress();
            let time = match total {
                Some(total) => format!("{} / {}", format_mmss(elapsed), format_mmss(total)),
                None => format_mmss(elapsed),
            };
            let state = match app.player.state() {
                PlaybackState::Playing => "Playing",
                PlaybackState::Paused => "Paused",
                PlaybackState::Idle => "Stopped",
            };
            song = format!(
                "Song: {} - {} [{}] • {}",
                track.title, track.artist, time, state
            );
        }
    }

    let volume = if app.player.is_muted() {
        "Volume: muted".to_string()
    } else {
        format!("Volume: {:.0}%", app.player.volume() * 100.0)
    };
    let repeat = match app.player.repeat() {
        RepeatMode::Off => "Repeat: off",
        RepeatMode::All => "Repeat: all",
        RepeatMode::One => "Repeat: one",
    };
    let shuffle = if app.player.shuffle() {
        "Shuffle: ON"
    } else {
        "Shuffle: OFF"
    };
    let flags = format!(
        "{} • {} • {} • Tracks: {}",
        shuffle,
        repeat,
        volume,
        app.library.len()
    );

    vec![Line::from(song), Line::from(flags)]
}

fn track_items(app: &App, rows: &[usize]) -> Vec<ListItem<'static>> {
    rows.iter()
        .enumerate()
        .map(|(position, &index)| {
            let Some(track) = app.library.get(index) else {
                return ListItem::new("?");
            };
            let duration = track
                .duration
                .map(format_mmss)
                .unwrap_or_else(|| "--:--".to_string());
            let favorite = if app.favorites.contains(&track.id) {
                "♥ "
            } else {
                "  "
            };
            ListItem::new(format!(
                "{:02}  {}{} - {}  [{}]",
                position + 1,
                favorite,
                track.title,
                track.artist,
                duration
            ))
        })
        .collect()
}

fn playlist_items(app: &App) -> Vec<ListItem<'static>> {
    app.playlists
        .iter()
        .map(|playlist| {
            ListItem::new(format!(
                "{}  ({} tracks)",
                playlist.name,
                playlist.tracks.len()
            ))
        })
        .collect()
}

fn empty_state_text(view: View) -> &'static str {
    match view {
        View::Library => "No music found. Add music files to your library.",
        View::Playlists => "No playlists yet. Create your first playlist!",
        View::Favorites => "No favorite tracks yet. Press f on any track to add it!",
        View::Recent => "No recent plays. Start listening to see your history!",
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, ctx: &ViewContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header: title + view tabs.
    let header = Paragraph::new(header_tabs(ctx.view, app.theme))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" rondo ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box.
    let status = Paragraph::new(status_lines(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Main pane: playlists root or a track list.
    let showing_playlist_root = ctx.view == View::Playlists && ctx.open_playlist.is_none();
    let items = if showing_playlist_root {
        playlist_items(app)
    } else {
        track_items(app, ctx.rows)
    };

    let pane_title = match (ctx.view, ctx.open_playlist) {
        (View::Playlists, Some(playlist_id)) => {
            let name = app
                .playlists
                .get(playlist_id)
                .map(|p| p.name.clone())
                .unwrap_or_default();
            format!(" {name} ")
        }
        (view, _) if !ctx.query.trim().is_empty() && view == View::Library => {
            format!(" Search Results for \"{}\" ", ctx.query.trim())
        }
        (view, _) => format!(" {} ", view.title()),
    };

    if items.is_empty() {
        let empty = Paragraph::new(empty_state_text(ctx.view))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(pane_title));
        frame.render_widget(empty, chunks[2]);
    } else {
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(pane_title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(ctx.selected));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Notice / prompt line.
    let message: Paragraph = match &ctx.prompt {
        Prompt::Input { label, value } => {
            Paragraph::new(format!("{label}: {value}█")).block(Block::bordered().title(" input "))
        }
        Prompt::Confirm { question } => Paragraph::new(format!("{question} [y/N]"))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::bordered().title(" confirm ")),
        Prompt::Chooser { .. } | Prompt::None => match ctx.notice {
            Some(notice) => Paragraph::new(notice.message.clone())
                .style(Style::default().fg(severity_color(notice.severity)))
                .block(Block::bordered().title(" notice ")),
            None => Paragraph::new("").block(Block::bordered()),
        },
    };
    frame.render_widget(message, chunks[3]);

    // Controls help.
    let controls = Paragraph::new(
        "[1-4] views | [enter] play/open | [space] play/pause | [h/l] prev/next | \
         [s] shuffle | [r] repeat | [m] mute | [-/+] volume | [←/→] seek | [f] favorite | \
         [a] add to playlist | [n] new playlist | [d] delete playlist | [o] import | \
         [/] search | [t] theme | [x] clear library | [q] quit",
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" controls ")
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(controls, chunks[4]);

    // Playlist chooser popup over the main pane.
    if let Prompt::Chooser {
        title,
        items,
        selected,
    } = &ctx.prompt
    {
        let popup_area = centered_rect_sized(40, (items.len() as u16 + 2).clamp(3, 12), chunks[2]);
        frame.render_widget(Clear, popup_area);

        let list = List::new(
            items
                .iter()
                .map(|item| ListItem::new(item.clone()))
                .collect::<Vec<_>>(),
        )
        .block(Block::default().borders(Borders::ALL).title(title.clone()))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if !items.is_empty() {
            state.select(Some(*selected));
        }
        frame.render_stateful_widget(list, popup_area, &mut state);
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}
