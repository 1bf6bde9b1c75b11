//! Errors for this library

/// All the known errors that can occur whilst loading Starfield's config.
#[derive(Debug, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum ConfigError {
    #[snafu(display("Couldn't read config file at {}", path.display()))]
    /// The config file couldn't be read.
    Read {
        /// Where we looked for the config file.
        path: std::path::PathBuf,
        /// The parent error type
        source: std::io::Error,
    },

    #[snafu(display("Couldn't write the default config to {}", path.display()))]
    /// The bundled default config couldn't be copied into the user's config directory.
    Write {
        /// Where we tried to write the config.
        path: std::path::PathBuf,
        /// The parent error type
        source: std::io::Error,
    },

    #[snafu(display("Bad config file: {source}"))]
    /// The config file isn't valid TOML, or has values of the wrong type.
    Parse {
        /// The parent error type
        source: toml::de::Error,
    },

    #[snafu(display("Invalid colour '{value}' for `{key}`, expected a hex colour like #9E00FF"))]
    /// A colour setting isn't a valid hex colour.
    Colour {
        /// The name of the offending setting.
        key: &'static str,
        /// What the user actually wrote.
        value: String,
        /// The parent error type
        source: palette::rgb::FromHexError,
    },

    #[snafu(display("Couldn't find a standard config directory on this system"))]
    /// The OS doesn't tell us where config files live.
    NoConfigDirectory,
}
