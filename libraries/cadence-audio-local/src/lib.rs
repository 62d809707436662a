//! Headless playback engine for local files
//!
//! This crate provides [`LocalEngine`], an implementation of
//! [`cadence_playback::PlaybackEngine`] that decodes local files with
//! Symphonia on a worker thread per track.
//!
//! # Features
//!
//! - Containers and codecs supported by Symphonia (WAV, FLAC, MP3, OGG, AAC, ...)
//! - Real-time paced decoding without an output device
//! - Accurate seeking
//! - Ready, end-of-media and error callbacks tagged with the session
//!
//! # Example
//!
//! ```no_run
//! use cadence_audio_local::{LocalEngine, LocalEngineConfig};
//! use cadence_playback::{PlaybackConfig, PlaybackController, TrackRef};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = PlaybackController::new(
//!     LocalEngine::new(LocalEngineConfig::default()),
//!     PlaybackConfig::default(),
//! );
//! let _dispatcher = controller.spawn_event_loop()?;
//!
//! controller.open_and_play(TrackRef::new("/music/song.flac"))?;
//! println!("{}", controller.current_display().position_text);
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod handle;
mod probe;
mod worker;

pub use engine::{LocalEngine, LocalEngineConfig};
pub use error::{LocalAudioError, Result};
pub use handle::LocalHandle;
pub use probe::{DecodeStep, ProbedMedia};
