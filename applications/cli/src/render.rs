//! Text rendering for the terminal

use cadence_playback::{ControllerEvent, DisplayState, RepeatMode, TrackRef};

use crate::error::Result;

/// `Now Playing: <name>` line
pub fn now_playing(display: &DisplayState) -> String {
    match &display.track_name {
        Some(name) => format!("Now Playing: {}", name),
        None => "Nothing playing".to_string(),
    }
}

/// Position, progress, status and volume on one line
pub fn status_line(display: &DisplayState) -> String {
    format!(
        "{} ({:.0}%) [{:?}] volume {:.0}%",
        display.position_text,
        display.percent,
        display.status,
        display.volume * 100.0
    )
}

/// Numbered playlist, current track marked with `*`
pub fn playlist_lines(tracks: &[TrackRef], current: Option<usize>) -> Vec<String> {
    if tracks.is_empty() {
        return vec!["Playlist is empty".to_string()];
    }

    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if Some(i) == current { '*' } else { ' ' };
            format!("{} {:>3}. {}", marker, i + 1, track.name())
        })
        .collect()
}

/// Human-readable line for a controller event
pub fn event_line(event: &ControllerEvent) -> String {
    match event {
        ControllerEvent::TrackChanged { name, .. } => format!("Now Playing: {}", name),
        ControllerEvent::StatusChanged { status } => format!("Status: {:?}", status),
        ControllerEvent::PlaylistChanged { length } => format!("Playlist: {} tracks", length),
        ControllerEvent::VolumeChanged { volume } => format!("Volume: {:.0}%", volume * 100.0),
        ControllerEvent::Error { message } => format!("Could not play media: {}", message),
    }
}

/// JSON line for a controller event
pub fn event_json(event: &ControllerEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

/// Name of a repeat mode as typed by the user
pub fn repeat_name(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Playlist => "playlist",
        RepeatMode::Track => "track",
    }
}
