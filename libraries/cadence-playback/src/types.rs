//! Core types for playback control

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::time::{format_position, POSITION_PLACEHOLDER};

/// A playable media item: an opaque locator plus the name shown to the user
///
/// The display name defaults to the last path segment of the locator, so
/// `/music/song.mp3` and `file:/music/song.mp3` both display as `song.mp3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    locator: String,
    name: String,
}

impl TrackRef {
    /// Create a reference whose display name is derived from the locator
    pub fn new(locator: impl Into<String>) -> Self {
        let locator = locator.into();
        let name = display_name(&locator);
        Self { locator, name }
    }

    /// Create a reference with an explicit display name
    pub fn with_name(locator: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            name: name.into(),
        }
    }

    /// Create a reference for a local file
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(path.as_ref().to_string_lossy())
    }

    /// Path or URI handed to the engine
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Name shown in playlists and the now-playing line
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn display_name(locator: &str) -> String {
    let trimmed = locator.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(locator)
        .to_string()
}

/// Session playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No media, or media still loading
    Unknown,

    /// Media loaded and duration known
    Ready,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Stopped (rewound) or finished
    Stopped,

    /// Engine failure; terminal until a new load succeeds
    Halted,
}

impl PlaybackStatus {
    /// Whether `play` can start playback from this status
    pub fn can_play(self) -> bool {
        matches!(self, Self::Ready | Self::Paused | Self::Stopped)
    }
}

/// What happens when a track reaches its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Advance to the next playlist entry, wrapping to the first
    #[default]
    Playlist,

    /// Replay the track that just finished
    Track,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial repeat mode (default: Playlist)
    pub repeat: RepeatMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            repeat: RepeatMode::Playlist,
        }
    }
}

/// Playback position of the active session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Elapsed time in the current track
    pub current: Duration,

    /// Track length; `None` until the engine reports ready
    pub total: Option<Duration>,
}

impl Position {
    /// Progress through the track in percent (0-100)
    ///
    /// Returns 0 while the duration is unknown or zero.
    pub fn percent(&self) -> f64 {
        match self.total {
            Some(total) if !total.is_zero() => {
                (self.current.as_secs_f64() / total.as_secs_f64() * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    /// `MM:SS/MM:SS` style text, or the placeholder while the duration is unknown
    pub fn formatted(&self) -> String {
        match self.total {
            Some(total) => format_position(self.current, total),
            None => POSITION_PLACEHOLDER.to_string(),
        }
    }
}

/// Consistent snapshot of everything a transport UI renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Formatted position (`01:05/02:10`)
    pub position_text: String,

    /// Progress in percent (0-100) for slider rendering
    pub percent: f64,

    /// Name of the track bound to the session
    pub track_name: Option<String>,

    /// Session status
    pub status: PlaybackStatus,

    /// Current volume (0.0-1.0)
    pub volume: f32,

    /// Playlist cursor
    pub index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_from_path_and_uri() {
        assert_eq!(TrackRef::new("/music/song.mp3").name(), "song.mp3");
        assert_eq!(TrackRef::new("file:/home/me/a%20b.wav").name(), "a%20b.wav");
        assert_eq!(TrackRef::new(r"C:\Music\clip.mp4").name(), "clip.mp4");
        assert_eq!(TrackRef::new("plain").name(), "plain");
    }

    #[test]
    fn explicit_name_is_kept() {
        let track = TrackRef::with_name("/music/01.flac", "Opening");
        assert_eq!(track.locator(), "/music/01.flac");
        assert_eq!(track.name(), "Opening");
    }

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.volume, 1.0);
        assert_eq!(config.repeat, RepeatMode::Playlist);
    }

    #[test]
    fn playable_statuses() {
        assert!(PlaybackStatus::Ready.can_play());
        assert!(PlaybackStatus::Paused.can_play());
        assert!(PlaybackStatus::Stopped.can_play());
        assert!(!PlaybackStatus::Unknown.can_play());
        assert!(!PlaybackStatus::Halted.can_play());
        assert!(!PlaybackStatus::Playing.can_play());
    }

    #[test]
    fn position_percent_and_text() {
        let position = Position {
            current: Duration::from_secs(65),
            total: Some(Duration::from_secs(130)),
        };
        assert_eq!(position.percent(), 50.0);
        assert_eq!(position.formatted(), "01:05/02:10");
    }

    #[test]
    fn unknown_duration_renders_placeholder() {
        let position = Position {
            current: Duration::from_secs(3),
            total: None,
        };
        assert_eq!(position.percent(), 0.0);
        assert_eq!(position.formatted(), POSITION_PLACEHOLDER);
    }

    #[test]
    fn percent_is_clamped_past_the_end() {
        let position = Position {
            current: Duration::from_secs(200),
            total: Some(Duration::from_secs(100)),
        };
        assert_eq!(position.percent(), 100.0);
    }
}
