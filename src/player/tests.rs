use std::sync::Arc;
use std::time::Duration;

use crate::library::{Library, Track, TrackId, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

use super::{NullEngine, NullHandle, PlaybackState, Player, RepeatMode};

fn track(n: usize, duration: Option<Duration>) -> Track {
    Track {
        id: TrackId::from(format!("track-{n}")),
        title: format!("Track {n}"),
        artist: UNKNOWN_ARTIST.to_string(),
        album: UNKNOWN_ALBUM.to_string(),
        duration,
        artwork: None,
        payload: Arc::from(Vec::<u8>::new()),
    }
}

fn library(len: usize, duration: Option<Duration>) -> Library {
    Library::with_tracks((0..len).map(|n| track(n, duration)).collect())
}

fn player() -> (Player, NullHandle) {
    let (engine, handle) = NullEngine::new();
    (Player::new(Box::new(engine)), handle)
}

#[test]
fn play_track_loads_plays_and_reports_the_id() {
    let lib = library(3, None);
    let (mut player, handle) = player();

    let started = player.play_track(&lib, 1).unwrap();
    assert_eq!(started, Some(TrackId::from("track-1")));
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.current(), Some(1));

    let state = handle.lock().unwrap();
    assert_eq!(state.loaded, vec![TrackId::from("track-1")]);
    assert!(state.playing);
}

#[test]
fn play_track_ignores_out_of_range_indices() {
    let lib = library(2, None);
    let (mut player, handle) = player();

    assert_eq!(player.play_track(&lib, 5).unwrap(), None);
    assert_eq!(player.state(), PlaybackState::Idle);
    assert!(handle.lock().unwrap().loaded.is_empty());
}

#[test]
fn toggle_play_is_a_no_op_on_an_empty_library() {
    let lib = Library::new();
    let (mut player, handle) = player();

    assert_eq!(player.toggle_play(&lib).unwrap(), None);
    assert_eq!(player.state(), PlaybackState::Idle);
    assert!(handle.lock().unwrap().loaded.is_empty());
}

#[test]
fn toggle_play_from_idle_starts_the_first_track() {
    let lib = library(3, None);
    let (mut player, _handle) = player();

    let started = player.toggle_play(&lib).unwrap();
    assert_eq!(started, Some(TrackId::from("track-0")));
    assert_eq!(player.state(), PlaybackState::Playing);
}

#[test]
fn toggle_play_flips_between_playing_and_paused() {
    let lib = library(3, None);
    let (mut player, handle) = player();
    player.play_track(&lib, 0).unwrap();

    assert_eq!(player.toggle_play(&lib).unwrap(), None);
    assert_eq!(player.state(), PlaybackState::Paused);
    assert!(!handle.lock().unwrap().playing);

    assert_eq!(player.toggle_play(&lib).unwrap(), None);
    assert_eq!(player.state(), PlaybackState::Playing);
    assert!(handle.lock().unwrap().playing);
}

#[test]
fn next_and_previous_wrap_at_both_ends() {
    let lib = library(3, None);
    let (mut player, _handle) = player();

    player.play_track(&lib, 2).unwrap();
    assert_eq!(
        player.next_track(&lib).unwrap(),
        Some(TrackId::from("track-0"))
    );

    player.play_track(&lib, 0).unwrap();
    assert_eq!(
        player.previous_track(&lib).unwrap(),
        Some(TrackId::from("track-2"))
    );
}

#[test]
fn track_end_with_repeat_off_parks_on_the_last_track() {
    let lib = library(3, None);
    let (mut player, handle) = player();
    player.play_track(&lib, 2).unwrap();

    assert_eq!(player.handle_track_end(&lib).unwrap(), None);
    assert_eq!(player.state(), PlaybackState::Paused);
    assert_eq!(player.current(), Some(2));
    assert!(!handle.lock().unwrap().playing);
}

#[test]
fn track_end_mid_list_advances_with_repeat_off() {
    let lib = library(3, None);
    let (mut player, _handle) = player();
    player.play_track(&lib, 0).unwrap();

    assert_eq!(
        player.handle_track_end(&lib).unwrap(),
        Some(TrackId::from("track-1"))
    );
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.current(), Some(1));
}

#[test]
fn track_end_with_repeat_all_wraps_to_the_first_track() {
    let lib = library(3, None);
    let (mut player, _handle) = player();
    player.play_track(&lib, 2).unwrap();
    player.set_repeat(RepeatMode::All);

    assert_eq!(
        player.handle_track_end(&lib).unwrap(),
        Some(TrackId::from("track-0"))
    );
    assert_eq!(player.current(), Some(0));
    assert_eq!(player.state(), PlaybackState::Playing);
}

#[test]
fn track_end_with_repeat_one_restarts_without_reporting_a_play() {
    let lib = library(3, None);
    let (mut player, handle) = player();
    player.play_track(&lib, 1).unwrap();
    player.set_repeat(RepeatMode::One);

    assert_eq!(player.handle_track_end(&lib).unwrap(), None);
    assert_eq!(player.current(), Some(1));
    assert_eq!(player.state(), PlaybackState::Playing);

    let state = handle.lock().unwrap();
    assert_eq!(
        state.loaded,
        vec![TrackId::from("track-1"), TrackId::from("track-1")]
    );
    assert!(state.playing);
}

#[test]
fn track_end_under_shuffle_keeps_advancing_even_on_the_last_track() {
    let lib = library(3, None);
    let (mut player, _handle) = player();
    player.play_track(&lib, 2).unwrap();
    player.set_shuffle(true);

    assert!(player.handle_track_end(&lib).unwrap().is_some());
    assert_eq!(player.state(), PlaybackState::Playing);
}

#[test]
fn poll_finished_only_fires_for_a_playing_finished_stream() {
    let lib = library(3, None);
    let (mut player, handle) = player();

    // Nothing loaded yet: no advance.
    assert_eq!(player.poll_finished(&lib).unwrap(), None);

    player.play_track(&lib, 0).unwrap();
    assert_eq!(player.poll_finished(&lib).unwrap(), None);

    handle.lock().unwrap().finished = true;
    assert_eq!(
        player.poll_finished(&lib).unwrap(),
        Some(TrackId::from("track-1"))
    );
}

#[test]
fn volume_clamps_and_unmutes() {
    let (mut player, handle) = player();

    player.set_volume_level(-0.5);
    assert_eq!(player.volume(), 0.0);
    assert!(!player.is_muted());

    player.set_volume_level(1.5);
    assert_eq!(player.volume(), 1.0);
    assert_eq!(handle.lock().unwrap().volume, 1.0);

    player.toggle_mute();
    player.set_volume_level(0.3);
    assert!(!player.is_muted());
    assert_eq!(handle.lock().unwrap().volume, 0.3);
}

#[test]
fn nudges_compute_the_new_level_from_the_current_one() {
    let (mut player, _handle) = player();

    player.set_volume_level(0.5);
    player.nudge_volume(-0.2);
    assert!((player.volume() - 0.3).abs() < f32::EPSILON);

    player.set_volume_level(0.0);
    player.nudge_volume(-0.05);
    assert_eq!(player.volume(), 0.0);
}

#[test]
fn toggle_mute_silences_and_restores_the_engine() {
    let (mut player, handle) = player();
    player.set_volume_level(0.8);

    assert!(player.toggle_mute());
    assert_eq!(handle.lock().unwrap().volume, 0.0);
    assert_eq!(player.volume(), 0.8);

    assert!(!player.toggle_mute());
    assert_eq!(handle.lock().unwrap().volume, 0.8);
}

#[test]
fn seek_is_a_no_op_until_duration_is_known() {
    let lib = library(1, None);
    let (mut player, handle) = player();
    player.play_track(&lib, 0).unwrap();

    player.seek_to(0.5);
    assert!(handle.lock().unwrap().seeks.is_empty());
}

#[test]
fn seek_targets_the_clamped_fraction_of_the_duration() {
    let lib = library(1, Some(Duration::from_secs(200)));
    let (mut player, handle) = player();
    player.play_track(&lib, 0).unwrap();

    player.seek_to(0.5);
    player.seek_to(1.5);
    player.seek_to(-0.5);

    let state = handle.lock().unwrap();
    assert_eq!(
        state.seeks,
        vec![
            Duration::from_secs(100),
            Duration::from_secs(200),
            Duration::ZERO
        ]
    );
}

#[test]
fn repeat_cycles_off_all_one() {
    let (mut player, _handle) = player();
    assert_eq!(player.repeat(), RepeatMode::Off);
    assert_eq!(player.cycle_repeat(), RepeatMode::All);
    assert_eq!(player.cycle_repeat(), RepeatMode::One);
    assert_eq!(player.cycle_repeat(), RepeatMode::Off);
}

#[test]
fn stop_returns_to_idle() {
    let lib = library(2, None);
    let (mut player, handle) = player();
    player.play_track(&lib, 1).unwrap();

    player.stop();
    assert_eq!(player.state(), PlaybackState::Idle);
    assert_eq!(player.current(), None);
    assert!(handle.lock().unwrap().stopped);
}
