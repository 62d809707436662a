//! Playback engine seam
//!
//! Decoding and rendering live behind [`PlaybackEngine`]. The controller opens
//! one [`EngineHandle`] per session; the engine reports lifecycle changes
//! through the [`EngineEvents`] emitter it was given, which tags every event
//! with the session it belongs to.
//!
//! Emitting never touches controller state directly, so an engine may fire
//! events from any thread, including synchronously from inside `open` or
//! `play`.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;
use std::time::Duration;

use crate::error::Result;
use crate::types::TrackRef;

/// Identity of one session; increases with every load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(u64);

impl SessionId {
    /// Raw epoch value
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle callbacks raised by an engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Media is ready; carries the duration when the container reports one
    Ready { duration: Option<Duration> },

    /// Playback reached the end of the track
    EndOfMedia,

    /// Unrecoverable failure during playback
    Error { message: String },
}

/// An engine event tagged with its session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub session: SessionId,
    pub event: EngineEvent,
}

/// Emitter handed to an engine when a session opens
#[derive(Debug, Clone)]
pub struct EngineEvents {
    session: SessionId,
    tx: Sender<SessionEvent>,
}

impl EngineEvents {
    /// Create an emitter for `session` sending into `tx`
    pub fn new(session: SessionId, tx: Sender<SessionEvent>) -> Self {
        Self { session, tx }
    }

    /// Emitter plus the receiving end, for driving an engine without a controller
    pub fn channel(session: SessionId) -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = unbounded();
        (Self::new(session, tx), rx)
    }

    /// Session these events belong to
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Report readiness
    pub fn ready(&self, duration: Option<Duration>) {
        self.emit(EngineEvent::Ready { duration });
    }

    /// Report end of media
    pub fn end_of_media(&self) {
        self.emit(EngineEvent::EndOfMedia);
    }

    /// Report an unrecoverable error
    pub fn error(&self, message: impl Into<String>) {
        self.emit(EngineEvent::Error {
            message: message.into(),
        });
    }

    fn emit(&self, event: EngineEvent) {
        let event = SessionEvent {
            session: self.session,
            event,
        };
        if let Err(err) = self.tx.send(event) {
            tracing::trace!(session = %self.session, event = ?err.0.event, "controller gone, dropping engine event");
        }
    }
}

/// Platform playback engine
///
/// `open` must return promptly: it resolves the reference and acquires
/// resources, while readiness is reported later through
/// [`EngineEvents::ready`]. A reference that cannot be resolved to playable
/// media is reported as [`PlaybackError::Load`](crate::PlaybackError::Load).
pub trait PlaybackEngine: Send + Sync {
    /// Open `track` for a new session
    fn open(&self, track: &TrackRef, events: EngineEvents) -> Result<Box<dyn EngineHandle>>;
}

/// One opened track
///
/// Engine resources are released when the handle is dropped.
pub trait EngineHandle: Send {
    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Stop playback and rewind
    fn stop(&mut self);

    /// Jump to `position` from the start of the track
    fn seek(&mut self, position: Duration);

    /// Set output gain (0.0-1.0)
    fn set_volume(&mut self, volume: f32);

    /// Current playback position
    fn current_time(&self) -> Duration;

    /// Track duration, if known
    ///
    /// Consulted when the `Ready` event arrives without a duration.
    fn duration(&self) -> Option<Duration>;
}
