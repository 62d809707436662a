//! Controller events
//!
//! Notifications for the UI layer. Emitted when:
//! - the session status changes (loading, ready, playing, paused, ...)
//! - a new track is bound to the session
//! - tracks are added to or removed from the playlist
//! - the volume changes
//! - a load or engine error occurs

use serde::{Deserialize, Serialize};

use crate::types::PlaybackStatus;

/// Events published by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// Session status changed
    StatusChanged {
        /// The new status
        status: PlaybackStatus,
    },

    /// A track was bound to a new session
    TrackChanged {
        /// Playlist index of the track, if it is in the playlist
        index: Option<usize>,
        /// Display name of the track
        name: String,
    },

    /// Playlist changed (tracks added/removed)
    PlaylistChanged {
        /// New playlist length
        length: usize,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume (0.0-1.0)
        volume: f32,
    },

    /// A track could not be loaded or the engine failed
    Error {
        /// Error message
        message: String,
    },
}
