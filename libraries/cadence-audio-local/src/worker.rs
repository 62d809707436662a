//! Decode worker
//!
//! One worker thread per opened track. The worker owns the decoder and
//! paces decoding against a wall clock, so the reported position advances
//! in real time even though samples are not rendered to a device.
//!
//! ```text
//!  LocalHandle                       Worker thread
//!      │   Play/Pause/Stop/Seek          │
//!      │────────────────────────────────>│ decode packets up to now + tick
//!      │                                 │ store position in Shared
//!      │   current_time() <── Shared ────│
//!      │                                 │── Ready / EndOfMedia / Error ──> controller
//!      │   Shutdown (on drop)            │
//!      │────────────────────────────────>│ exit
//! ```

use cadence_playback::EngineEvents;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::probe::{DecodeStep, ProbedMedia};

/// Commands sent from a handle to its worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Command {
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Shutdown,
}

/// State shared between a handle and its worker
#[derive(Debug)]
pub(crate) struct Shared {
    position_us: AtomicU64,
    volume_bits: AtomicU32,
}

impl Shared {
    pub(crate) fn new(volume: f32) -> Self {
        Self {
            position_us: AtomicU64::new(0),
            volume_bits: AtomicU32::new(volume.to_bits()),
        }
    }

    pub(crate) fn position(&self) -> Duration {
        Duration::from_micros(self.position_us.load(Ordering::Relaxed))
    }

    pub(crate) fn set_position(&self, position: Duration) {
        let micros = u64::try_from(position.as_micros()).unwrap_or(u64::MAX);
        self.position_us.store(micros, Ordering::Relaxed);
    }

    pub(crate) fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    pub(crate) fn set_volume(&self, volume: f32) {
        self.volume_bits.store(volume.to_bits(), Ordering::Relaxed);
    }
}

/// Wall-clock anchor of the current playing stretch
#[derive(Debug, Clone, Copy)]
struct Clock {
    started: Instant,
    from: Duration,
}

impl Clock {
    fn start(from: Duration) -> Self {
        Self {
            started: Instant::now(),
            from,
        }
    }

    fn now(&self) -> Duration {
        self.from + self.started.elapsed()
    }
}

pub(crate) struct Worker {
    media: ProbedMedia,
    commands: Receiver<Command>,
    events: EngineEvents,
    shared: Arc<Shared>,
    tick: Duration,

    clock: Option<Clock>,
    position: Duration,
    decoded_until: Duration,
    at_end: bool,
    finished: bool,
    failed: bool,
}

impl Worker {
    pub(crate) fn new(
        media: ProbedMedia,
        commands: Receiver<Command>,
        events: EngineEvents,
        shared: Arc<Shared>,
        tick: Duration,
    ) -> Self {
        Self {
            media,
            commands,
            events,
            shared,
            tick,
            clock: None,
            position: Duration::ZERO,
            decoded_until: Duration::ZERO,
            at_end: false,
            finished: false,
            failed: false,
        }
    }

    /// Run until shutdown or until the handle disappears
    pub(crate) fn run(mut self) {
        let session = self.events.session();
        tracing::debug!(%session, "decode worker started");
        self.events.ready(self.media.duration());

        loop {
            let command = if self.clock.is_some() {
                match self.commands.recv_timeout(self.tick) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match self.commands.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                }
            };

            match command {
                Some(Command::Shutdown) => break,
                Some(command) => self.handle(command),
                None => {}
            }

            if self.clock.is_some() {
                self.advance();
            }
        }

        tracing::debug!(%session, "decode worker stopped");
    }

    fn handle(&mut self, command: Command) {
        if self.failed {
            return;
        }

        match command {
            Command::Play => {
                if self.finished {
                    self.rewind();
                }
                if self.clock.is_none() {
                    self.clock = Some(Clock::start(self.position));
                }
            }
            Command::Pause => {
                self.sync_position();
                self.clock = None;
            }
            Command::Stop => {
                self.clock = None;
                self.rewind();
            }
            Command::Seek(target) => self.seek(target),
            Command::Shutdown => {}
        }
    }

    /// Decode ahead of the wall clock and publish the position
    fn advance(&mut self) {
        let Some(clock) = self.clock else {
            return;
        };
        let now = clock.now();
        let horizon = now + self.tick;

        while !self.at_end && self.decoded_until < horizon {
            match self.media.decode_next() {
                Ok(DecodeStep::Decoded(end)) => self.decoded_until = end,
                Ok(DecodeStep::Skipped) => {}
                Ok(DecodeStep::End) => self.at_end = true,
                Err(err) => {
                    tracing::error!(session = %self.events.session(), error = %err, "decode failed");
                    self.failed = true;
                    self.clock = None;
                    self.events.error(err.to_string());
                    return;
                }
            }
        }

        if self.at_end && now >= self.decoded_until {
            self.position = self.decoded_until;
            self.shared.set_position(self.position);
            self.clock = None;
            self.finished = true;
            tracing::debug!(session = %self.events.session(), "end of media");
            self.events.end_of_media();
            return;
        }

        self.position = now.min(self.decoded_until.max(clock.from));
        self.shared.set_position(self.position);
    }

    fn sync_position(&mut self) {
        if let Some(clock) = self.clock {
            self.position = clock.now().min(self.decoded_until.max(clock.from));
            self.shared.set_position(self.position);
        }
    }

    fn seek(&mut self, target: Duration) {
        match self.media.seek(target) {
            Ok(reached) => {
                self.position = reached;
                self.decoded_until = reached;
                self.at_end = false;
                self.finished = false;
                self.shared.set_position(reached);
                if self.clock.is_some() {
                    self.clock = Some(Clock::start(reached));
                }
            }
            Err(err) => {
                tracing::warn!(session = %self.events.session(), error = %err, "seek ignored");
                self.shared.set_position(self.position);
            }
        }
    }

    fn rewind(&mut self) {
        self.seek(Duration::ZERO);
        self.position = Duration::ZERO;
        self.shared.set_position(Duration::ZERO);
    }
}
