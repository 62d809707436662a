//! Playback session: one track bound to one engine handle
//!
//! ```text
//!            load ok           ready              play
//!  (any) ─────────────► Unknown ─────► Ready ───────────► Playing ⇄ Paused
//!    │                    │              │                   │        │
//!    │ load failed        │ error        └──── stop ─────────┴────────┴──► Stopped
//!    └──────────────► Halted ◄──────────────── error (from any status)
//! ```
//!
//! End of media is a transient signal; the session rests in `Stopped` and the
//! controller decides what plays next.

use crossbeam_channel::Sender;
use std::time::Duration;

use crate::engine::{EngineEvents, EngineHandle, PlaybackEngine, SessionEvent, SessionId};
use crate::error::Result;
use crate::types::{PlaybackStatus, Position, TrackRef};

/// The live binding between a track and an engine handle
pub struct Session {
    id: SessionId,
    track: Option<TrackRef>,
    handle: Option<Box<dyn EngineHandle>>,
    status: PlaybackStatus,
    duration: Option<Duration>,
    volume: f32,
    autoplay: bool,
    events_tx: Sender<SessionEvent>,
}

impl Session {
    /// Create an idle session; engine events for later loads go to `events_tx`
    pub fn new(events_tx: Sender<SessionEvent>, volume: f32) -> Self {
        Self {
            id: SessionId::default(),
            track: None,
            handle: None,
            status: PlaybackStatus::Unknown,
            duration: None,
            volume: clamp_volume(volume, 1.0),
            autoplay: false,
            events_tx,
        }
    }

    /// Replace the current media with `track`
    ///
    /// The previous engine handle is released before the new one is opened,
    /// whether or not the open succeeds. On failure the session is `Halted`.
    pub fn load(&mut self, engine: &dyn PlaybackEngine, track: TrackRef) -> Result<SessionId> {
        self.release();

        self.id = self.id.next();
        self.status = PlaybackStatus::Unknown;
        self.duration = None;
        self.autoplay = false;

        let events = EngineEvents::new(self.id, self.events_tx.clone());
        let opened = engine.open(&track, events);
        self.track = Some(track);

        match opened {
            Ok(mut handle) => {
                handle.set_volume(self.volume);
                self.handle = Some(handle);
                tracing::debug!(session = %self.id, "engine handle opened");
                Ok(self.id)
            }
            Err(err) => {
                self.status = PlaybackStatus::Halted;
                tracing::warn!(session = %self.id, error = %err, "engine failed to open track");
                Err(err)
            }
        }
    }

    /// Start playback, or arrange for it to start once the media is ready
    pub fn request_play(&mut self) {
        if self.status == PlaybackStatus::Unknown && self.handle.is_some() {
            self.autoplay = true;
        } else {
            self.play();
        }
    }

    /// Start or resume playback (from Ready, Paused or Stopped)
    pub fn play(&mut self) {
        if !self.status.can_play() {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            handle.play();
            self.status = PlaybackStatus::Playing;
        }
    }

    /// Pause playback (from Playing)
    pub fn pause(&mut self) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            handle.pause();
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Stop playback (from any status except Unknown and Halted)
    pub fn stop(&mut self) {
        if matches!(self.status, PlaybackStatus::Unknown | PlaybackStatus::Halted) {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            handle.stop();
            self.status = PlaybackStatus::Stopped;
        }
    }

    /// Seek to `fraction` of the track, clamped into `[0, 1]`
    ///
    /// Ignored while the duration is unknown, when halted, or for NaN.
    /// Returns the position sought to.
    pub fn seek(&mut self, fraction: f64) -> Option<Duration> {
        if self.status == PlaybackStatus::Halted || fraction.is_nan() {
            return None;
        }
        let total = self.duration?;
        let handle = self.handle.as_mut()?;

        let target = total.mul_f64(fraction.clamp(0.0, 1.0));
        handle.seek(target);
        Some(target)
    }

    /// Set output gain, clamped into `[0, 1]`; NaN keeps the current volume
    ///
    /// Applied regardless of status and carried over to later loads.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = clamp_volume(volume, self.volume);
        if let Some(handle) = self.handle.as_mut() {
            handle.set_volume(self.volume);
        }
        self.volume
    }

    /// Engine reported ready
    ///
    /// When the event carries no duration, the handle is asked for one.
    pub fn on_ready(&mut self, duration: Option<Duration>) {
        if self.status != PlaybackStatus::Unknown {
            return;
        }
        self.duration = duration.or_else(|| self.handle.as_ref().and_then(|h| h.duration()));
        self.status = PlaybackStatus::Ready;
        if std::mem::take(&mut self.autoplay) {
            self.play();
        }
    }

    /// Engine reported end of media
    ///
    /// Returns whether the signal applies, i.e. the session had media loaded.
    pub fn on_end_of_media(&mut self) -> bool {
        match self.status {
            PlaybackStatus::Ready
            | PlaybackStatus::Playing
            | PlaybackStatus::Paused
            | PlaybackStatus::Stopped => {
                self.status = PlaybackStatus::Stopped;
                true
            }
            PlaybackStatus::Unknown | PlaybackStatus::Halted => false,
        }
    }

    /// Engine reported an unrecoverable error
    pub fn on_error(&mut self) {
        self.status = PlaybackStatus::Halted;
        self.autoplay = false;
    }

    /// Position at call time; `total` is `None` until ready
    pub fn position(&self) -> Position {
        let current = match (&self.handle, self.status) {
            (Some(handle), status) if status != PlaybackStatus::Unknown => handle.current_time(),
            _ => Duration::ZERO,
        };
        Position {
            current,
            total: self.duration,
        }
    }

    /// Current session epoch
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Track bound to this session
    pub fn track(&self) -> Option<&TrackRef> {
        self.track.as_ref()
    }

    /// Session status
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Current volume (0.0-1.0)
    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!(session = %self.id, "releasing engine handle");
            drop(handle);
        }
    }
}

fn clamp_volume(volume: f32, fallback: f32) -> f32 {
    if volume.is_nan() {
        fallback
    } else {
        volume.clamp(0.0, 1.0)
    }
}
