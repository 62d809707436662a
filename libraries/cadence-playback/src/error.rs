//! Error types for playback control

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Playlist index outside `[0, len)`
    #[error("Index {index} out of range for playlist of {len} tracks")]
    OutOfRange { index: usize, len: usize },

    /// The engine could not resolve or open a track reference
    #[error("Could not load {track}: {reason}")]
    Load { track: String, reason: String },

    /// Asynchronous failure reported by the engine during playback
    #[error("Engine fault: {0}")]
    EngineFault(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaybackError {
    /// Build a load error for `track` from any displayable cause
    pub fn load(track: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Load {
            track: track.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
