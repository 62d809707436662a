//! Headless local-file engine

use cadence_playback::{EngineEvents, EngineHandle, PlaybackEngine, PlaybackError, TrackRef};
use crossbeam_channel::unbounded;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use url::Url;

use crate::handle::LocalHandle;
use crate::probe::ProbedMedia;
use crate::worker::{Shared, Worker};

/// Configuration for [`LocalEngine`]
#[derive(Debug, Clone)]
pub struct LocalEngineConfig {
    /// Longest the worker sleeps between command checks while playing
    /// (default: 20ms)
    pub tick: Duration,
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(20),
        }
    }
}

/// Plays local audio files without an output device
///
/// Files are decoded with Symphonia at real-time pace; the decoded audio is
/// discarded.
#[derive(Debug, Clone, Default)]
pub struct LocalEngine {
    config: LocalEngineConfig,
}

impl LocalEngine {
    /// Create an engine with the given configuration
    pub fn new(config: LocalEngineConfig) -> Self {
        Self { config }
    }
}

impl PlaybackEngine for LocalEngine {
    fn open(
        &self,
        track: &TrackRef,
        events: EngineEvents,
    ) -> cadence_playback::Result<Box<dyn EngineHandle>> {
        let path = local_path(track.locator());
        let media =
            ProbedMedia::open(&path).map_err(|e| PlaybackError::load(track.locator(), e))?;
        let duration = media.duration();

        let (commands_tx, commands_rx) = unbounded();
        let shared = Arc::new(Shared::new(1.0));
        let session = events.session();
        let worker = Worker::new(media, commands_rx, events, shared.clone(), self.config.tick);

        let worker = thread::Builder::new()
            .name(format!("cadence-decode-{}", session.get()))
            .spawn(move || worker.run())?;

        tracing::debug!(%session, track = %track.name(), ?duration, "opened local media");
        Ok(Box::new(LocalHandle::new(
            commands_tx,
            shared,
            duration,
            worker,
        )))
    }
}

/// Resolve a `file:` URI or a plain path to a filesystem path
///
/// Percent-escapes in URIs are decoded. Anything that is not a `file:` URI
/// is taken as a path as-is.
fn local_path(locator: &str) -> PathBuf {
    match Url::parse(locator) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .unwrap_or_else(|()| PathBuf::from(locator)),
        _ => PathBuf::from(locator),
    }
}
