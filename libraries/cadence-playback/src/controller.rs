//! Playback controller
//!
//! Orchestrates the playlist and the active session. Engine callbacks arrive
//! on a channel and are applied by [`PlaybackController::pump_events`] or by
//! the dispatcher thread started with
//! [`PlaybackController::spawn_event_loop`]. Events that belong to a session
//! which has since been replaced are dropped.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine::{EngineEvent, PlaybackEngine, SessionEvent};
use crate::error::{PlaybackError, Result};
use crate::events::ControllerEvent;
use crate::playlist::Playlist;
use crate::session::Session;
use crate::types::{DisplayState, PlaybackConfig, PlaybackStatus, RepeatMode, TrackRef};

/// How often the dispatcher thread checks whether the controller is gone
const DISPATCH_POLL: Duration = Duration::from_millis(100);

/// Playlist and transport controller
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct PlaybackController {
    inner: Arc<Inner>,
}

struct Inner {
    engine: Arc<dyn PlaybackEngine>,
    state: Mutex<ControllerState>,
    events_rx: Receiver<SessionEvent>,
}

struct ControllerState {
    playlist: Playlist,
    session: Session,
    repeat: RepeatMode,
    last_error: Option<String>,
    subscribers: Vec<Sender<ControllerEvent>>,
}

impl PlaybackController {
    /// Create a controller driving `engine`
    pub fn new<E: PlaybackEngine + 'static>(engine: E, config: PlaybackConfig) -> Self {
        Self::with_engine(Arc::new(engine), config)
    }

    /// Create a controller from a shared engine
    pub fn with_engine(engine: Arc<dyn PlaybackEngine>, config: PlaybackConfig) -> Self {
        let (events_tx, events_rx) = unbounded();
        let state = ControllerState {
            playlist: Playlist::new(),
            session: Session::new(events_tx, config.volume),
            repeat: config.repeat,
            last_error: None,
            subscribers: Vec::new(),
        };

        Self {
            inner: Arc::new(Inner {
                engine,
                state: Mutex::new(state),
                events_rx,
            }),
        }
    }

    /// Append `track`, select it and start playing it
    pub fn open_and_play(&self, track: TrackRef) -> Result<()> {
        self.inner.with_state(|state, engine| {
            let index = state.playlist.add_and_select(track);
            state.publish_playlist();
            state.start_index(engine, index)
        })
    }

    /// Select the track at `index` and start playing it
    pub fn play_selected(&self, index: usize) -> Result<()> {
        self.inner.with_state(|state, engine| {
            state.playlist.select(index)?;
            state.start_index(engine, index)
        })
    }

    /// Pause when playing, play when paused, ready or stopped
    pub fn toggle_play_pause(&self) {
        self.inner.with_state(|state, _| match state.session.status() {
            PlaybackStatus::Playing => state.session.pause(),
            status if status.can_play() => state.session.play(),
            _ => {}
        });
    }

    /// Start or resume playback
    pub fn play(&self) {
        self.inner.with_state(|state, _| state.session.play());
    }

    /// Pause playback
    pub fn pause(&self) {
        self.inner.with_state(|state, _| state.session.pause());
    }

    /// Stop playback
    pub fn stop(&self) {
        self.inner.with_state(|state, _| state.session.stop());
    }

    /// Advance to the next track, wrapping to the first
    ///
    /// Does nothing when the playlist is empty.
    pub fn next(&self) -> Result<()> {
        self.inner.with_state(|state, engine| match state.playlist.next() {
            Some(index) => state.start_index(engine, index),
            None => Ok(()),
        })
    }

    /// Go back to the previous track, wrapping to the last
    ///
    /// Does nothing when the playlist is empty.
    pub fn previous(&self) -> Result<()> {
        self.inner
            .with_state(|state, engine| match state.playlist.previous() {
                Some(index) => state.start_index(engine, index),
                None => Ok(()),
            })
    }

    /// Seek to `fraction` (0.0-1.0) of the current track
    pub fn seek(&self, fraction: f64) -> Option<Duration> {
        self.inner.with_state(|state, _| state.session.seek(fraction))
    }

    /// Set volume (0.0-1.0); returns the applied volume
    pub fn set_volume(&self, volume: f32) -> f32 {
        self.inner.with_state(|state, _| {
            let before = state.session.volume();
            let applied = state.session.set_volume(volume);
            if applied != before {
                state.publish(ControllerEvent::VolumeChanged { volume: applied });
            }
            applied
        })
    }

    /// Current volume (0.0-1.0)
    pub fn volume(&self) -> f32 {
        self.inner.lock().session.volume()
    }

    /// Choose what happens at the end of a track
    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        tracing::debug!(?mode, "repeat mode changed");
        self.inner.lock().repeat = mode;
    }

    /// Current repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.inner.lock().repeat
    }

    /// Append `track` to the playlist without starting it
    pub fn add_to_playlist(&self, track: TrackRef) {
        self.inner.with_state(|state, _| {
            state.playlist.add(track);
            state.publish_playlist();
        });
    }

    /// Remove the track at `index`; the active session is left alone
    pub fn remove_from_playlist(&self, index: usize) -> Option<TrackRef> {
        self.inner.with_state(|state, _| {
            let removed = state.playlist.remove(index);
            if removed.is_some() {
                state.publish_playlist();
            }
            removed
        })
    }

    /// Consistent snapshot for rendering
    pub fn current_display(&self) -> DisplayState {
        let state = self.inner.lock();
        let position = state.session.position();
        DisplayState {
            position_text: position.formatted(),
            percent: position.percent(),
            track_name: state.session.track().map(|track| track.name().to_string()),
            status: state.session.status(),
            volume: state.session.volume(),
            index: state.playlist.current_index(),
        }
    }

    /// Copy of the playlist in play order
    pub fn playlist(&self) -> Vec<TrackRef> {
        self.inner.lock().playlist.tracks().to_vec()
    }

    /// Playlist cursor
    pub fn current_index(&self) -> Option<usize> {
        self.inner.lock().playlist.current_index()
    }

    /// Session status
    pub fn status(&self) -> PlaybackStatus {
        self.inner.lock().session.status()
    }

    /// Most recent load or engine error, cleared by the next successful load
    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    /// Receive controller events
    pub fn subscribe(&self) -> Receiver<ControllerEvent> {
        let (tx, rx) = unbounded();
        self.inner.lock().subscribers.push(tx);
        rx
    }

    /// Apply every queued engine event on the calling thread
    ///
    /// Returns the number of events processed, stale ones included.
    pub fn pump_events(&self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.inner.events_rx.try_recv() {
            self.inner.apply(event);
            processed += 1;
        }
        processed
    }

    /// Apply engine events on a dedicated thread as they arrive
    ///
    /// The thread exits once every handle to this controller is dropped.
    pub fn spawn_event_loop(&self) -> Result<JoinHandle<()>> {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let events_rx = self.inner.events_rx.clone();

        let handle = thread::Builder::new()
            .name("cadence-dispatch".into())
            .spawn(move || dispatch_loop(&weak, &events_rx))?;

        Ok(handle)
    }
}

fn dispatch_loop(weak: &Weak<Inner>, events_rx: &Receiver<SessionEvent>) {
    tracing::debug!("event dispatcher started");
    loop {
        match events_rx.recv_timeout(DISPATCH_POLL) {
            Ok(event) => match weak.upgrade() {
                Some(inner) => inner.apply(event),
                None => break,
            },
            Err(RecvTimeoutError::Timeout) => {
                if weak.strong_count() == 0 {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!("event dispatcher stopped");
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the lock and publish a status change if one happened
    fn with_state<R>(&self, f: impl FnOnce(&mut ControllerState, &dyn PlaybackEngine) -> R) -> R {
        let mut state = self.lock();
        let before = state.session.status();
        let result = f(&mut *state, self.engine.as_ref());
        let after = state.session.status();
        if after != before {
            tracing::debug!(session = %state.session.id(), ?before, ?after, "status changed");
            state.publish(ControllerEvent::StatusChanged { status: after });
        }
        result
    }

    fn apply(&self, event: SessionEvent) {
        self.with_state(|state, engine| {
            let live = state.session.id();
            if event.session != live {
                tracing::trace!(session = %event.session, %live, event = ?event.event, "dropping stale engine event");
                return;
            }

            match event.event {
                EngineEvent::Ready { duration } => {
                    tracing::debug!(session = %live, ?duration, "media ready");
                    state.session.on_ready(duration);
                }
                EngineEvent::EndOfMedia => {
                    if state.session.on_end_of_media() {
                        tracing::debug!(session = %live, "end of media");
                        state.advance(engine);
                    }
                }
                EngineEvent::Error { message } => {
                    state.session.on_error();
                    let err = PlaybackError::EngineFault(message);
                    tracing::error!(session = %live, error = %err, "engine failure");
                    state.record_error(&err);
                }
            }
        });
    }
}

impl ControllerState {
    fn start_index(&mut self, engine: &dyn PlaybackEngine, index: usize) -> Result<()> {
        let Some(track) = self.playlist.get(index).cloned() else {
            return Err(PlaybackError::OutOfRange {
                index,
                len: self.playlist.len(),
            });
        };
        self.load_and_play(engine, track, Some(index))
    }

    fn load_and_play(
        &mut self,
        engine: &dyn PlaybackEngine,
        track: TrackRef,
        index: Option<usize>,
    ) -> Result<()> {
        let name = track.name().to_string();
        let loaded = self.session.load(engine, track);
        self.publish(ControllerEvent::TrackChanged {
            index,
            name: name.clone(),
        });

        match loaded {
            Ok(session) => {
                tracing::info!(%session, ?index, track = %name, "loading track");
                self.last_error = None;
                self.session.request_play();
                Ok(())
            }
            Err(err) => {
                tracing::error!(?index, track = %name, error = %err, "could not load track");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// React to the end of the current track
    fn advance(&mut self, engine: &dyn PlaybackEngine) {
        let advanced = match self.repeat {
            RepeatMode::Playlist => match self.playlist.next() {
                Some(index) => self.start_index(engine, index),
                None => Ok(()),
            },
            RepeatMode::Track => match self.session.track().cloned() {
                Some(track) => {
                    let index = self
                        .playlist
                        .current()
                        .filter(|current| **current == track)
                        .and(self.playlist.current_index());
                    self.load_and_play(engine, track, index)
                }
                None => Ok(()),
            },
        };

        if let Err(err) = advanced {
            tracing::debug!(error = %err, "automatic advance failed");
        }
    }

    fn record_error(&mut self, err: &PlaybackError) {
        let message = err.to_string();
        self.last_error = Some(message.clone());
        self.publish(ControllerEvent::Error { message });
    }

    fn publish_playlist(&mut self) {
        let length = self.playlist.len();
        self.publish(ControllerEvent::PlaylistChanged { length });
    }

    fn publish(&mut self, event: ControllerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scripted::ScriptedEngine;

    fn controller() -> (PlaybackController, ScriptedEngine) {
        let engine = ScriptedEngine::default();
        let controller = PlaybackController::new(engine.clone(), PlaybackConfig::default());
        (controller, engine)
    }

    #[test]
    fn open_and_play_starts_on_ready() {
        let (controller, engine) = controller();
        controller.open_and_play(TrackRef::new("/music/a.mp3")).unwrap();
        assert_eq!(controller.status(), PlaybackStatus::Unknown);

        engine.last_emitter().ready(Some(Duration::from_secs(30)));
        assert_eq!(controller.pump_events(), 1);

        assert_eq!(controller.status(), PlaybackStatus::Playing);
        assert_eq!(controller.current_index(), Some(0));
    }

    #[test]
    fn stale_events_are_dropped() {
        let (controller, engine) = controller();
        controller.add_to_playlist(TrackRef::new("/music/a.mp3"));
        controller.add_to_playlist(TrackRef::new("/music/b.mp3"));

        controller.play_selected(0).unwrap();
        let stale = engine.emitter(0);
        controller.play_selected(1).unwrap();

        stale.ready(Some(Duration::from_secs(10)));
        stale.end_of_media();
        controller.pump_events();

        assert_eq!(controller.status(), PlaybackStatus::Unknown);
        assert_eq!(controller.current_index(), Some(1));
        assert_eq!(engine.opened().len(), 2);
    }

    #[test]
    fn toggle_ignored_while_loading() {
        let (controller, engine) = controller();
        controller.open_and_play(TrackRef::new("/music/a.mp3")).unwrap();

        controller.toggle_play_pause();
        assert_eq!(controller.status(), PlaybackStatus::Unknown);

        engine.last_emitter().ready(None);
        controller.pump_events();
        controller.toggle_play_pause();
        assert_eq!(controller.status(), PlaybackStatus::Paused);
        controller.toggle_play_pause();
        assert_eq!(controller.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn engine_error_halts_and_records() {
        let (controller, engine) = controller();
        controller.open_and_play(TrackRef::new("/music/a.mp3")).unwrap();
        engine.last_emitter().error("device lost");
        controller.pump_events();

        assert_eq!(controller.status(), PlaybackStatus::Halted);
        assert_eq!(
            controller.last_error().as_deref(),
            Some("Engine fault: device lost")
        );
    }

    #[test]
    fn subscribers_see_status_and_track_events() {
        let (controller, engine) = controller();
        let events = controller.subscribe();

        controller.open_and_play(TrackRef::new("/music/a.mp3")).unwrap();
        engine.last_emitter().ready(Some(Duration::from_secs(5)));
        controller.pump_events();

        let received: Vec<ControllerEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                ControllerEvent::PlaylistChanged { length: 1 },
                ControllerEvent::TrackChanged {
                    index: Some(0),
                    name: "a.mp3".to_string()
                },
                ControllerEvent::StatusChanged {
                    status: PlaybackStatus::Playing
                },
            ]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let (controller, _engine) = controller();
        drop(controller.subscribe());
        let kept = controller.subscribe();

        controller.add_to_playlist(TrackRef::new("/music/a.mp3"));

        assert_eq!(controller.inner.lock().subscribers.len(), 1);
        assert_eq!(kept.try_recv().unwrap(), ControllerEvent::PlaylistChanged { length: 1 });
    }

    #[test]
    fn event_loop_applies_events_in_background() {
        let (controller, engine) = controller();
        let dispatcher = controller.spawn_event_loop().unwrap();

        controller.open_and_play(TrackRef::new("/music/a.mp3")).unwrap();
        engine.last_emitter().ready(Some(Duration::from_secs(5)));

        let mut status = controller.status();
        for _ in 0..100 {
            if status == PlaybackStatus::Playing {
                break;
            }
            thread::sleep(Duration::from_millis(10));
            status = controller.status();
        }
        assert_eq!(status, PlaybackStatus::Playing);

        drop(controller);
        dispatcher.join().unwrap();
    }
}
