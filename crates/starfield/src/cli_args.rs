//! All the CLI arguments for Starfield

use crate::config::main::{Config, LogLevel};
use crate::output::Format;

/// Render shooting stars flying across a viewport
#[derive(clap::Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = "Render shooting stars that fly in from the edges of a viewport"
)]
#[non_exhaustive]
pub struct CliArgs {
    /// Path to a config file. Defaults to `starfield.toml` in the user's config directory.
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Width of the viewport in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Height of the viewport in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Stop after rendering this many frames. Without it Starfield runs until interrupted.
    #[arg(short, long)]
    pub frames: Option<u64>,

    /// Seed the random number generators, for reproducible fields.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// How to write the frames.
    #[arg(long, value_enum, default_value_t)]
    pub format: Format,

    /// Directory for SVG frames.
    #[arg(short, long, default_value = "starfield-frames")]
    pub output: std::path::PathBuf,

    /// Override the log level from the config.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Override the log file location from the config.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,
}

impl CliArgs {
    /// CLI arguments take precedence over the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(path) = &self.log_path {
            config.log_path.clone_from(path);
        }
    }
}
