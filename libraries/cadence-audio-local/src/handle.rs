//! Engine handle for one opened file

use cadence_playback::EngineHandle;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::worker::{Command, Shared};

/// Handle to a decode worker
///
/// Dropping the handle shuts the worker down and waits for it to exit.
pub struct LocalHandle {
    commands: Sender<Command>,
    shared: Arc<Shared>,
    duration: Option<Duration>,
    worker: Option<JoinHandle<()>>,
}

impl LocalHandle {
    pub(crate) fn new(
        commands: Sender<Command>,
        shared: Arc<Shared>,
        duration: Option<Duration>,
        worker: JoinHandle<()>,
    ) -> Self {
        Self {
            commands,
            shared,
            duration,
            worker: Some(worker),
        }
    }

    /// Stored output gain (0.0-1.0)
    pub fn volume(&self) -> f32 {
        self.shared.volume()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::debug!(?command, "decode worker already gone");
        }
    }
}

impl EngineHandle for LocalHandle {
    fn play(&mut self) {
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn stop(&mut self) {
        self.shared.set_position(Duration::ZERO);
        self.send(Command::Stop);
    }

    fn seek(&mut self, position: Duration) {
        self.shared.set_position(position);
        self.send(Command::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.shared.set_volume(volume.clamp(0.0, 1.0));
    }

    fn current_time(&self) -> Duration {
        self.shared.position()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl Drop for LocalHandle {
    fn drop(&mut self) {
        self.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("decode worker panicked");
            }
        }
    }
}
