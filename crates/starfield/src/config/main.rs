//! All of the user config for Starfield.

use snafu::{OptionExt as _, ResultExt as _};

use crate::errors::{ConfigError, NoConfigDirectorySnafu, ParseSnafu, ReadSnafu, WriteSnafu};

/// A copy of the default config file. It gets copied to the user's config folder the first time
/// they start Starfield without pointing at a config file of their own.
static DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

/// The name of the main config file inside the config directory.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "starfield.toml";

/// The valid log levels. Based on our `tracing` crate.
#[derive(serde::Serialize, serde::Deserialize, clap::ValueEnum, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error
    Error,
    /// Warnings
    Warn,
    /// Info
    Info,
    /// Debug
    Debug,
    /// Trace
    Trace,
    /// No logging
    Off,
}

/// Managing user config.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// Target frame rate
    pub frame_rate: u32,
    /// Width of the viewport in pixels
    pub width: u32,
    /// Height of the viewport in pixels
    pub height: u32,
    /// The maximum log level
    pub log_level: LogLevel,
    /// The location of the log file.
    pub log_path: std::path::PathBuf,
    /// The shooting stars themselves
    pub stars: super::stars::StarsConfig,
}

impl Default for Config {
    fn default() -> Self {
        let log_directory = match dirs::state_dir() {
            Some(directory) => directory,
            None => std::path::PathBuf::new().join("./"),
        };
        let log_path = log_directory.join("starfield").join("starfield.log");

        Self {
            frame_rate: 60,
            width: 1280,
            height: 720,
            log_level: LogLevel::Off,
            log_path,
            stars: super::stars::StarsConfig::default(),
        }
    }
}

impl Config {
    /// Get the stable location of Starfield's config directory on the user's system.
    pub fn default_directory() -> Result<std::path::PathBuf, ConfigError> {
        Ok(dirs::config_dir()
            .context(NoConfigDirectorySnafu)?
            .join("starfield"))
    }

    /// Load the config from the given path. Without a path the standard config location is used,
    /// and the bundled default config is written there if nothing exists yet.
    pub fn load(maybe_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let path = match maybe_path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::default_directory()?.join(DEFAULT_CONFIG_FILE_NAME);
                if !path.exists() {
                    Self::write_default(&path)?;
                }
                path
            }
        };

        tracing::info!("Loading the main Starfield config from: {path:?}");
        let data = std::fs::read_to_string(&path).context(ReadSnafu { path: path.clone() })?;
        tracing::trace!("Using config file:\n{data}");
        Self::parse(&data)
    }

    /// Parse config from a TOML string.
    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(data).context(ParseSnafu)
    }

    /// Copy the bundled default config to the given path.
    fn write_default(path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(directory) = path.parent() {
            std::fs::create_dir_all(directory).context(WriteSnafu { path })?;
        }
        std::fs::write(path, DEFAULT_CONFIG).context(WriteSnafu { path })
    }

    /// Validate the `[stars]` section, ready for the simulator.
    pub fn simulator(&self) -> Result<super::stars::SimulatorConfig, ConfigError> {
        super::stars::SimulatorConfig::new(&self.stars)
    }

    /// The frame rate, never less than 1.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate.max(1)
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp, reason = "Tests aren't so strict")]
mod test {
    use super::*;

    #[test]
    fn bundled_default_config_matches_defaults() {
        let parsed = Config::parse(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.frame_rate, defaults.frame_rate);
        assert_eq!(parsed.width, defaults.width);
        assert_eq!(parsed.height, defaults.height);
        assert_eq!(parsed.log_level, defaults.log_level);
        assert_eq!(parsed.stars, defaults.stars);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::parse(indoc::indoc! {r##"
            width = 100

            [stars]
            max_speed = 50.0
            star_color = "#ffffff"
            class_name = "background"
        "##})
        .unwrap();

        assert_eq!(config.width, 100);
        assert_eq!(config.height, 720);
        assert_eq!(config.stars.min_speed, 10.0);
        assert_eq!(config.stars.max_speed, 50.0);
        assert_eq!(config.stars.class_name.as_deref(), Some("background"));

        let simulator = config.simulator().unwrap();
        assert_eq!(simulator.star_color(), (255, 255, 255));
        assert_eq!(simulator.trail_color(), (0x2E, 0xB9, 0xDF));
    }

    #[test]
    fn bad_toml() {
        let error = Config::parse("frame_rate = \"fast\"").unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_frame_rate_is_clamped() {
        let config = Config {
            frame_rate: 0,
            ..Config::default()
        };
        assert_eq!(config.frame_rate(), 1);
    }

    #[test]
    fn load_from_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("custom.toml");
        std::fs::write(&path, "frame_rate = 24\nlog_level = \"debug\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.frame_rate, 24);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn load_missing_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("nope.toml");

        let error = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().contains("nope.toml"));
    }

    #[test]
    fn write_default_creates_parent_directories() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("nested").join(DEFAULT_CONFIG_FILE_NAME);

        Config::write_default(&path).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), DEFAULT_CONFIG);
    }
}
