//! Error types for the local engine

use thiserror::Error;

/// Result type for local media operations
pub type Result<T> = std::result::Result<T, LocalAudioError>;

/// Local media errors
#[derive(Debug, Error)]
pub enum LocalAudioError {
    /// File could not be opened
    #[error("Failed to open file: {0}")]
    Open(#[from] std::io::Error),

    /// Container format not recognised
    #[error("Failed to probe file: {0}")]
    Probe(String),

    /// Container has no decodable audio track
    #[error("No audio tracks found")]
    NoAudioTrack,

    /// No decoder for the track's codec
    #[error("Failed to create decoder: {0}")]
    Codec(String),

    /// Unrecoverable read or decode failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// Seek rejected by the container
    #[error("Seek failed: {0}")]
    Seek(String),
}
