//! Cadence Player - Terminal front-end
//!
//! Reads line commands, drives a [`cadence_playback::PlaybackController`]
//! backed by the headless local engine, and prints controller events.

pub mod command;
pub mod config;
pub mod error;
pub mod render;

mod app;

pub use app::{App, Flow};
pub use command::Command;
pub use config::CliConfig;
pub use error::{CliError, Result};

use cadence_playback::ControllerEvent;
use std::io::Write;

/// Print controller events until the controller goes away
///
/// Events are rendered as text lines, or as JSON lines when `json` is set.
pub fn print_events<W: Write>(
    events: impl IntoIterator<Item = ControllerEvent>,
    json: bool,
    mut out: W,
) -> Result<()> {
    for event in events {
        let line = if json {
            render::event_json(&event)?
        } else {
            render::event_line(&event)
        };
        writeln!(out, "{}", line)?;
        out.flush()?;
    }
    Ok(())
}
