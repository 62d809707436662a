//! Cadence Player - Playback Control
//!
//! Platform-agnostic playlist and transport control for Cadence Player.
//!
//! This crate provides:
//! - Position formatting (`MM:SS/MM:SS`, `H:MM:SS/H:MM:SS`)
//! - An ordered playlist with a wrapping cursor
//! - A playback session per loaded track (ready, playing, paused, stopped, halted)
//! - A controller tying both together (next/previous, end-of-media advance, repeat)
//! - Controller events for UI synchronization
//!
//! # Architecture
//!
//! `cadence-playback` performs no I/O of its own. Decoding and output are
//! provided by an implementation of [`PlaybackEngine`]; the engine reports
//! readiness, end of media and failures through the [`EngineEvents`] emitter
//! it receives for each session.
//!
//! # Example: Playlist and Transport
//!
//! ```rust
//! use cadence_playback::{
//!     EngineEvents, EngineHandle, PlaybackConfig, PlaybackController, PlaybackEngine,
//!     PlaybackStatus, Result, TrackRef,
//! };
//! use std::time::Duration;
//!
//! // An engine whose media is ready as soon as it is opened
//! struct InstantEngine;
//!
//! struct InstantHandle {
//!     position: Duration,
//! }
//!
//! impl PlaybackEngine for InstantEngine {
//!     fn open(&self, _track: &TrackRef, events: EngineEvents) -> Result<Box<dyn EngineHandle>> {
//!         events.ready(Some(Duration::from_secs(180)));
//!         Ok(Box::new(InstantHandle { position: Duration::ZERO }))
//!     }
//! }
//!
//! impl EngineHandle for InstantHandle {
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn stop(&mut self) { self.position = Duration::ZERO; }
//!     fn seek(&mut self, position: Duration) { self.position = position; }
//!     fn set_volume(&mut self, _volume: f32) {}
//!     fn current_time(&self) -> Duration { self.position }
//!     fn duration(&self) -> Option<Duration> { Some(Duration::from_secs(180)) }
//! }
//!
//! let controller = PlaybackController::new(InstantEngine, PlaybackConfig::default());
//! controller.open_and_play(TrackRef::new("/music/song.mp3"))?;
//! controller.pump_events();
//! assert_eq!(controller.status(), PlaybackStatus::Playing);
//!
//! controller.seek(0.5);
//! let display = controller.current_display();
//! assert_eq!(display.position_text, "01:30/03:00");
//! assert_eq!(display.track_name.as_deref(), Some("song.mp3"));
//! # Ok::<(), cadence_playback::PlaybackError>(())
//! ```
//!
//! # Example: Repeat
//!
//! ```rust
//! use cadence_playback::{RepeatMode, PlaybackConfig};
//!
//! let config = PlaybackConfig {
//!     volume: 0.8,
//!     repeat: RepeatMode::Track,
//! };
//! assert_eq!(config.repeat, RepeatMode::Track);
//! ```

mod controller;
mod engine;
mod error;
mod events;
mod playlist;
mod session;
pub mod time;
pub mod types;

// Public exports
pub use controller::PlaybackController;
pub use engine::{
    EngineEvent, EngineEvents, EngineHandle, PlaybackEngine, SessionEvent, SessionId,
};
pub use error::{PlaybackError, Result};
pub use events::ControllerEvent;
pub use playlist::Playlist;
pub use session::Session;
pub use time::{format_position, POSITION_PLACEHOLDER};
pub use types::{DisplayState, PlaybackConfig, PlaybackStatus, Position, RepeatMode, TrackRef};
