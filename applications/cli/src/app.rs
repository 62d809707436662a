//! Command execution
//!
//! [`App`] turns parsed commands into controller calls and writes command
//! feedback to its output. Load failures and engine errors are reported
//! through controller events, so they are not repeated here.

use cadence_playback::{PlaybackController, PlaybackError, TrackRef};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::command::{Command, HELP};
use crate::error::Result;
use crate::render;

/// Whether the command loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front-end state
pub struct App<W: Write> {
    controller: PlaybackController,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(controller: PlaybackController, out: W) -> Self {
        Self { controller, out }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Recover the output writer
    pub fn into_output(self) -> W {
        self.out
    }

    /// Add files given on the command line
    pub fn enqueue(&mut self, files: &[PathBuf]) {
        for file in files {
            self.controller.add_to_playlist(TrackRef::from_path(file));
        }
    }

    /// Parse and run one input line; parse errors are printed, not returned
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(err) => {
                writeln!(self.out, "{}", err)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one command
    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        tracing::debug!(?command, "executing command");

        match command {
            Command::Open(path) => {
                let outcome = self.controller.open_and_play(TrackRef::new(path));
                self.report(outcome)?;
            }
            Command::Add(paths) => {
                let count = paths.len();
                for path in paths {
                    self.controller.add_to_playlist(TrackRef::new(path));
                }
                writeln!(self.out, "Added {} track(s)", count)?;
            }
            Command::Remove(index) => match self.controller.remove_from_playlist(index) {
                Some(track) => writeln!(self.out, "Removed {}", track.name())?,
                None => writeln!(self.out, "No track {}", index + 1)?,
            },
            Command::Play(None) => self.controller.play(),
            Command::Play(Some(index)) => {
                let outcome = self.controller.play_selected(index);
                self.report(outcome)?;
            }
            Command::Pause => self.controller.pause(),
            Command::Toggle => self.controller.toggle_play_pause(),
            Command::Stop => self.controller.stop(),
            Command::Next => {
                let outcome = self.controller.next();
                self.report(outcome)?;
            }
            Command::Previous => {
                let outcome = self.controller.previous();
                self.report(outcome)?;
            }
            Command::Seek(fraction) => {
                if self.controller.seek(fraction).is_none() {
                    writeln!(self.out, "Cannot seek: nothing ready to play")?;
                }
            }
            Command::Volume(volume) => {
                let applied = self.controller.set_volume(volume);
                writeln!(self.out, "Volume: {:.0}%", applied * 100.0)?;
            }
            Command::Repeat(mode) => {
                self.controller.set_repeat_mode(mode);
                writeln!(self.out, "Repeat: {}", render::repeat_name(mode))?;
            }
            Command::List => {
                let tracks = self.controller.playlist();
                let current = self.controller.current_index();
                for line in render::playlist_lines(&tracks, current) {
                    writeln!(self.out, "{}", line)?;
                }
            }
            Command::Status => {
                let display = self.controller.current_display();
                writeln!(self.out, "{}", render::now_playing(&display))?;
                writeln!(self.out, "{}", render::status_line(&display))?;
                if let Some(error) = self.controller.last_error() {
                    writeln!(self.out, "Last error: {}", error)?;
                }
            }
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        self.out.flush()?;
        Ok(Flow::Continue)
    }

    /// Read commands from `input` until `quit` or end of input
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        for line in input.lines() {
            if self.execute_line(&line?)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn report(&mut self, outcome: cadence_playback::Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {}
            Err(PlaybackError::OutOfRange { index, len }) => {
                writeln!(self.out, "No track {} (playlist has {} tracks)", index + 1, len)?;
            }
            Err(err) => tracing::debug!(error = %err, "reported through controller events"),
        }
        Ok(())
    }
}
