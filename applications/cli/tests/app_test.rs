//! Front-end integration tests
//!
//! Runs scripted command sessions against a controller backed by an
//! in-memory engine and checks what the user would see.

use cadence_cli::{print_events, App, Flow};
use cadence_playback::{
    EngineEvents, EngineHandle, PlaybackConfig, PlaybackController, PlaybackEngine, PlaybackError,
    PlaybackStatus, RepeatMode, TrackRef,
};
use std::io::Cursor;
use std::time::Duration;

// ===== Test Helpers =====

/// Engine whose tracks are two minutes long and ready immediately;
/// locators containing "broken" fail to open
struct InstantEngine;

struct InstantHandle {
    position: Duration,
}

impl PlaybackEngine for InstantEngine {
    fn open(
        &self,
        track: &TrackRef,
        events: EngineEvents,
    ) -> cadence_playback::Result<Box<dyn EngineHandle>> {
        if track.locator().contains("broken") {
            return Err(PlaybackError::load(track.locator(), "unsupported format"));
        }
        events.ready(Some(Duration::from_secs(120)));
        Ok(Box::new(InstantHandle {
            position: Duration::ZERO,
        }))
    }
}

impl EngineHandle for InstantHandle {
    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn stop(&mut self) {
        self.position = Duration::ZERO;
    }

    fn seek(&mut self, position: Duration) {
        self.position = position;
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn current_time(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_secs(120))
    }
}

fn app() -> App<Vec<u8>> {
    let controller = PlaybackController::new(InstantEngine, PlaybackConfig::default());
    App::new(controller, Vec::new())
}

/// Run each line, applying engine events after every command
fn run_lines(app: &mut App<Vec<u8>>, lines: &[&str]) {
    for line in lines {
        app.execute_line(line).unwrap();
        app.controller().pump_events();
    }
}

fn output(app: App<Vec<u8>>) -> String {
    String::from_utf8(app.into_output()).unwrap()
}

// ===== Command Session Tests =====

#[test]
fn test_add_list_and_play() {
    let mut app = app();
    run_lines(
        &mut app,
        &["add /music/a.mp3 /music/b.mp3", "play 2", "list"],
    );

    assert_eq!(app.controller().status(), PlaybackStatus::Playing);
    assert_eq!(app.controller().current_index(), Some(1));

    let out = output(app);
    assert!(out.contains("Added 2 track(s)"));
    assert!(out.contains("    1. a.mp3"));
    assert!(out.contains("*   2. b.mp3"));
}

#[test]
fn test_add_quoted_path_with_spaces() {
    let mut app = app();
    run_lines(&mut app, &[r#"add "/music/My Song.flac" /music/b.mp3"#, "list"]);

    let tracks = app.controller().playlist();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].locator(), "/music/My Song.flac");

    let out = output(app);
    assert!(out.contains("Added 2 track(s)"));
    assert!(out.contains("    1. My Song.flac"));
}

#[test]
fn test_status_shows_position() {
    let mut app = app();
    run_lines(&mut app, &["open /music/song.flac", "seek 50", "volume 40", "status"]);

    let out = output(app);
    assert!(out.contains("Volume: 40%"));
    assert!(out.contains("Now Playing: song.flac"));
    assert!(out.contains("01:00/02:00 (50%) [Playing] volume 40%"));
}

#[test]
fn test_toggle_and_stop() {
    let mut app = app();
    run_lines(&mut app, &["open /music/song.flac", "toggle"]);
    assert_eq!(app.controller().status(), PlaybackStatus::Paused);

    run_lines(&mut app, &["toggle", "stop"]);
    assert_eq!(app.controller().status(), PlaybackStatus::Stopped);
}

#[test]
fn test_out_of_range_play_is_reported() {
    let mut app = app();
    run_lines(&mut app, &["add /music/a.mp3", "play 4", "remove 9"]);

    let out = output(app);
    assert!(out.contains("No track 4 (playlist has 1 tracks)"));
    assert!(out.contains("No track 9"));
}

#[test]
fn test_parse_errors_are_printed_and_loop_continues() {
    let mut app = app();
    let flow = app.execute_line("volume loud").unwrap();
    assert_eq!(flow, Flow::Continue);

    let out = output(app);
    assert!(out.contains("Invalid argument 'loud' for 'volume'"));
}

#[test]
fn test_repeat_command_sets_mode() {
    let mut app = app();
    run_lines(&mut app, &["repeat track"]);
    assert_eq!(app.controller().repeat_mode(), RepeatMode::Track);
    assert!(output(app).contains("Repeat: track"));
}

#[test]
fn test_run_stops_at_quit() {
    let mut app = app();
    let input = Cursor::new("add /music/a.mp3\nquit\nadd /music/b.mp3\n");

    app.run(input).unwrap();

    assert_eq!(app.controller().playlist().len(), 1);
}

// ===== Event Output Tests =====

#[test]
fn test_load_failure_event_renders_could_not_play() {
    let controller = PlaybackController::new(InstantEngine, PlaybackConfig::default());
    let events = controller.subscribe();
    let mut app = App::new(controller, Vec::new());

    run_lines(&mut app, &["open /music/broken.ogg"]);
    assert_eq!(app.controller().status(), PlaybackStatus::Halted);
    drop(app);

    let mut printed = Vec::new();
    print_events(events, false, &mut printed).unwrap();
    let printed = String::from_utf8(printed).unwrap();

    assert!(printed.contains("Now Playing: broken.ogg"));
    assert!(printed.contains("Could not play media: Could not load /music/broken.ogg: unsupported format"));
    assert!(printed.contains("Status: Halted"));
}

#[test]
fn test_json_event_lines() {
    let controller = PlaybackController::new(InstantEngine, PlaybackConfig::default());
    let events = controller.subscribe();
    controller.add_to_playlist(TrackRef::new("/music/a.mp3"));
    drop(controller);

    let mut printed = Vec::new();
    print_events(events, true, &mut printed).unwrap();

    assert_eq!(
        String::from_utf8(printed).unwrap(),
        "{\"type\":\"playlist_changed\",\"length\":1}\n"
    );
}
