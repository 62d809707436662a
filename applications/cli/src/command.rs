//! Line commands
//!
//! Track positions typed by the user are 1-based; parsed commands carry
//! 0-based playlist indices. Percentages are converted to fractions.

use cadence_playback::RepeatMode;
use std::str::FromStr;

use crate::error::CliError;

/// Shown for `help`
pub const HELP: &str = "\
Commands:
  open <path>           add a file and play it
  add <path>...         add files to the playlist
                        (quote paths that contain spaces)
  remove <n>            remove track n from the playlist
  play [n]              resume, or play track n
  pause                 pause playback
  toggle                play/pause
  stop                  stop and rewind
  next                  play the next track
  prev                  play the previous track
  seek <percent>        jump to a position (0-100)
  volume <percent>      set the volume (0-100)
  repeat <playlist|track>
                        what to play when a track ends
  list                  show the playlist
  status                show what is playing
  help                  show this help
  quit                  exit";

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(String),
    Add(Vec<String>),
    Remove(usize),
    Play(Option<usize>),
    Pause,
    Toggle,
    Stop,
    Next,
    Previous,
    /// Fraction of the track (0.0-1.0)
    Seek(f64),
    /// Volume (0.0-1.0)
    Volume(f32),
    Repeat(RepeatMode),
    List,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "open" => Command::Open(unquote(required(rest, "open", "a file path")?).to_string()),
            "add" => {
                let paths = split_paths(rest)?;
                if paths.is_empty() {
                    return Err(CliError::MissingArgument {
                        command: "add",
                        expected: "one or more file paths",
                    });
                }
                Command::Add(paths)
            }
            "remove" | "rm" => Command::Remove(position(required(rest, "remove", POSITION)?, "remove")?),
            "play" => {
                if rest.is_empty() {
                    Command::Play(None)
                } else {
                    Command::Play(Some(position(rest, "play")?))
                }
            }
            "pause" => Command::Pause,
            "toggle" => Command::Toggle,
            "stop" => Command::Stop,
            "next" => Command::Next,
            "prev" | "previous" => Command::Previous,
            "seek" => Command::Seek(percent(required(rest, "seek", PERCENT)?, "seek")?),
            "volume" | "vol" => {
                Command::Volume(percent(required(rest, "volume", PERCENT)?, "volume")? as f32)
            }
            "repeat" => Command::Repeat(repeat_mode(required(rest, "repeat", REPEAT)?)?),
            "list" | "ls" => Command::List,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CliError::UnknownCommand(word.to_string())),
        };

        Ok(command)
    }
}

/// Split on whitespace, keeping double-quoted paths together
fn split_paths(rest: &str) -> Result<Vec<String>, CliError> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in rest.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    paths.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if quoted {
        return Err(CliError::InvalidArgument {
            command: "add",
            value: rest.to_string(),
            expected: "paths with matching quotes",
        });
    }
    if !current.is_empty() {
        paths.push(current);
    }
    Ok(paths)
}

/// Drop one pair of surrounding double quotes
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

const POSITION: &str = "a track number starting at 1";
const PERCENT: &str = "a percentage between 0 and 100";
const REPEAT: &str = "'playlist' or 'track'";

fn required<'a>(rest: &'a str, command: &'static str, expected: &'static str) -> Result<&'a str, CliError> {
    if rest.is_empty() {
        Err(CliError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn position(value: &str, command: &'static str) -> Result<usize, CliError> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CliError::InvalidArgument {
            command,
            value: value.to_string(),
            expected: POSITION,
        }),
    }
}

fn percent(value: &str, command: &'static str) -> Result<f64, CliError> {
    let trimmed = value.trim_end_matches('%');
    match trimmed.parse::<f64>() {
        Ok(pct) if (0.0..=100.0).contains(&pct) => Ok(pct / 100.0),
        _ => Err(CliError::InvalidArgument {
            command,
            value: value.to_string(),
            expected: PERCENT,
        }),
    }
}

fn repeat_mode(value: &str) -> Result<RepeatMode, CliError> {
    match value.to_ascii_lowercase().as_str() {
        "playlist" | "all" => Ok(RepeatMode::Playlist),
        "track" | "one" => Ok(RepeatMode::Track),
        _ => Err(CliError::InvalidArgument {
            command: "repeat",
            value: value.to_string(),
            expected: REPEAT,
        }),
    }
}
