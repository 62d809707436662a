/// Front-end configuration
use crate::error::{CliError, Result};
use cadence_audio_local::LocalEngineConfig;
use cadence_playback::{PlaybackConfig, RepeatMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no `--config` path is given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_engine")]
    pub engine: EngineSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: f32,

    #[serde(default)]
    pub repeat: RepeatMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            playback: default_playback(),
            engine: default_engine(),
            logging: default_logging(),
        }
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `path` when given (it must exist), otherwise `cadence.toml` in
    /// the working directory if present. `CADENCE_`-prefixed environment
    /// variables override file values, with `__` between nested keys
    /// (`CADENCE_PLAYBACK__VOLUME=0.5`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, None)
    }

    /// Like [`CliConfig::load`], reading environment overrides from `env`
    /// instead of the process environment when given
    pub fn load_with(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(CliError::Config(format!(
                "playback.volume must be between 0.0 and 1.0 (got {})",
                self.playback.volume
            )));
        }

        if self.engine.tick_ms == 0 {
            return Err(CliError::Config(
                "engine.tick_ms must be greater than zero".to_string(),
            ));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(CliError::Config(
                "logging.filter must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Controller settings
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            volume: self.playback.volume,
            repeat: self.playback.repeat,
        }
    }

    /// Engine settings
    pub fn engine_config(&self) -> LocalEngineConfig {
        LocalEngineConfig {
            tick: Duration::from_millis(self.engine.tick_ms),
        }
    }
}

// Default values
fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        volume: default_volume(),
        repeat: RepeatMode::default(),
    }
}

fn default_volume() -> f32 {
    1.0
}

fn default_engine() -> EngineSettings {
    EngineSettings {
        tick_ms: default_tick_ms(),
    }
}

fn default_tick_ms() -> u64 {
    20
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_filter(),
    }
}

fn default_filter() -> String {
    "cadence=info,cadence_playback=info,cadence_audio_local=info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_sources() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.toml");
        fs::write(&path, "").unwrap();

        let config = CliConfig::load_with(Some(&path), no_env()).unwrap();

        assert_eq!(config.playback.volume, 1.0);
        assert_eq!(config.playback.repeat, RepeatMode::Playlist);
        assert_eq!(config.engine.tick_ms, 20);
        assert!(config.logging.filter.contains("cadence_playback=info"));
        config.validate().unwrap();
    }

    #[test]
    fn file_values_are_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cadence.toml");
        fs::write(
            &path,
            "[playback]\nvolume = 0.4\nrepeat = \"track\"\n\n[engine]\ntick_ms = 50\n",
        )
        .unwrap();

        let config = CliConfig::load_with(Some(&path), no_env()).unwrap();

        assert_eq!(config.playback.volume, 0.4);
        assert_eq!(config.playback.repeat, RepeatMode::Track);
        assert_eq!(config.engine_config().tick, Duration::from_millis(50));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cadence.toml");
        fs::write(&path, "[playback]\nvolume = 0.4\n").unwrap();

        let config = CliConfig::load_with(
            Some(&path),
            env(&[
                ("CADENCE_PLAYBACK__VOLUME", "0.9"),
                ("CADENCE_ENGINE__TICK_MS", "5"),
            ]),
        )
        .unwrap();

        assert_eq!(config.playback.volume, 0.9);
        assert_eq!(config.engine.tick_ms, 5);
        assert_eq!(config.playback_config().volume, 0.9);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let err = CliConfig::load_with(Some(&path), no_env()).unwrap_err();

        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = CliConfig::default();
        config.playback.volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.engine.tick_ms = 0;
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.logging.filter = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
