//! All the variables that can be configured for the shooting stars

use palette::Srgb;
use snafu::ResultExt as _;
use starfield_protocol::Rgb;

use crate::errors::{ColourSnafu, ConfigError};

/// The default colour of a star's head, as written in the config file.
pub const DEFAULT_STAR_COLOR: &str = "#9E00FF";

/// The default colour of a star's trail, as written in the config file.
pub const DEFAULT_TRAIL_COLOR: &str = "#2EB9DF";

/// The slowest a star is allowed to travel, in pixels per frame. Anything slower would never leave
/// the viewport.
pub const MIN_SPEED: f64 = 0.1;

/// The `[stars]` section of the config file, exactly as the user wrote it.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
#[non_exhaustive]
pub struct StarsConfig {
    /// The slowest a star can travel, in pixels per frame.
    pub min_speed: f64,
    /// The fastest a star can travel, in pixels per frame.
    pub max_speed: f64,
    /// The shortest wait before the next star appears, in milliseconds.
    pub min_delay: f64,
    /// The longest wait before the next star appears, in milliseconds.
    pub max_delay: f64,
    /// The colour of the star's head.
    pub star_color: String,
    /// The colour that the star's tail fades out from.
    pub trail_color: String,
    /// The length of a star before it has travelled anywhere.
    pub star_width: f64,
    /// The thickness of a star. It never changes.
    pub star_height: f64,
    /// Passed straight through to the containing SVG element.
    pub class_name: Option<String>,
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            min_speed: 10.0,
            max_speed: 30.0,
            min_delay: 1000.0,
            max_delay: 1200.0,
            star_color: DEFAULT_STAR_COLOR.to_owned(),
            trail_color: DEFAULT_TRAIL_COLOR.to_owned(),
            star_width: 20.0,
            star_height: 1.0,
            class_name: None,
        }
    }
}

/// The validated settings that the simulator runs with. They can't be changed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Speed range in pixels per frame, always ordered.
    speed: (f64, f64),
    /// Spawn delay range in milliseconds, always ordered.
    delay: (f64, f64),
    /// Head colour.
    star_color: Rgb,
    /// Tail colour.
    trail_color: Rgb,
    /// Unscaled star length.
    star_width: f64,
    /// Star thickness.
    star_height: f64,
    /// Container class passthrough.
    class_name: Option<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            speed: (10.0, 30.0),
            delay: (1000.0, 1200.0),
            star_color: (0x9E, 0x00, 0xFF),
            trail_color: (0x2E, 0xB9, 0xDF),
            star_width: 20.0,
            star_height: 1.0,
            class_name: None,
        }
    }
}

impl SimulatorConfig {
    /// Validate the user's settings.
    ///
    /// Ranges that were written back-to-front are swapped rather than rejected, negative delays
    /// are treated as 0, and speeds are never less than `MIN_SPEED`.
    pub fn new(stars: &StarsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            speed: floor_speed(normalise_range("speed", stars.min_speed, stars.max_speed)),
            delay: normalise_range("delay", stars.min_delay, stars.max_delay),
            star_color: parse_colour("star_color", &stars.star_color)?,
            trail_color: parse_colour("trail_color", &stars.trail_color)?,
            star_width: stars.star_width,
            star_height: stars.star_height,
            class_name: stars.class_name.clone(),
        })
    }

    /// The slowest a star can travel.
    pub const fn min_speed(&self) -> f64 {
        self.speed.0
    }

    /// The fastest a star can travel.
    pub const fn max_speed(&self) -> f64 {
        self.speed.1
    }

    /// The shortest wait between stars, in milliseconds.
    pub const fn min_delay(&self) -> f64 {
        self.delay.0
    }

    /// The longest wait between stars, in milliseconds.
    pub const fn max_delay(&self) -> f64 {
        self.delay.1
    }

    /// The colour of a star's head.
    pub const fn star_color(&self) -> Rgb {
        self.star_color
    }

    /// The colour of a star's trail.
    pub const fn trail_color(&self) -> Rgb {
        self.trail_color
    }

    /// The unscaled length of a star.
    pub const fn star_width(&self) -> f64 {
        self.star_width
    }

    /// The thickness of a star.
    pub const fn star_height(&self) -> f64 {
        self.star_height
    }

    /// The class for the containing element.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }
}

/// Make sure that `min <= max` and that neither is negative.
fn normalise_range(name: &str, min: f64, max: f64) -> (f64, f64) {
    let mut range = (min.max(0.0), max.max(0.0));
    if range.0 > range.1 {
        tracing::warn!("`min_{name}` ({min}) is greater than `max_{name}` ({max}), swapping them");
        range = (range.1, range.0);
    }
    range
}

/// Every star has to move, otherwise it would never be culled.
fn floor_speed((min, max): (f64, f64)) -> (f64, f64) {
    if min < MIN_SPEED {
        tracing::warn!("Star speeds below {MIN_SPEED} are raised to {MIN_SPEED}");
    }
    (min.max(MIN_SPEED), max.max(MIN_SPEED))
}

/// Parse a hex colour like `#9E00FF`, `9e00ff` or `#f0f`.
pub(crate) fn parse_colour(key: &'static str, value: &str) -> Result<Rgb, ConfigError> {
    let colour: Srgb<u8> = value.trim().parse().context(ColourSnafu { key, value })?;
    Ok((colour.red, colour.green, colour.blue))
}

#[cfg(test)]
#[expect(clippy::float_cmp, reason = "Tests aren't so strict")]
mod test {
    use super::*;
    use crate::particle::Viewport;
    use crate::random::seeded;
    use crate::simulation::Simulation;

    #[test]
    fn defaults_match_the_default_colours() {
        let from_strings = SimulatorConfig::new(&StarsConfig::default()).unwrap();
        assert_eq!(from_strings, SimulatorConfig::default());
    }

    #[test]
    fn reversed_ranges_are_swapped() {
        let stars = StarsConfig {
            min_speed: 30.0,
            max_speed: 10.0,
            min_delay: 500.0,
            max_delay: 100.0,
            ..StarsConfig::default()
        };
        let config = SimulatorConfig::new(&stars).unwrap();

        assert_eq!((config.min_speed(), config.max_speed()), (10.0, 30.0));
        assert_eq!((config.min_delay(), config.max_delay()), (100.0, 500.0));
    }

    #[test]
    fn negative_values_are_floored() {
        let stars = StarsConfig {
            min_speed: -5.0,
            min_delay: -1.0,
            ..StarsConfig::default()
        };
        let config = SimulatorConfig::new(&stars).unwrap();

        assert_eq!(config.min_speed(), MIN_SPEED);
        assert_eq!(config.min_delay(), 0.0);
    }

    #[test]
    fn stationary_stars_still_move_and_leave() {
        let stars = StarsConfig {
            min_speed: -5.0,
            max_speed: 0.0,
            ..StarsConfig::default()
        };
        let config = SimulatorConfig::new(&stars).unwrap();
        assert_eq!((config.min_speed(), config.max_speed()), (MIN_SPEED, MIN_SPEED));

        let viewport = Viewport::new(100.0, 100.0);
        let mut simulation = Simulation::new(config);
        let mut random = seeded(Some(4));
        for _ in 0..50 {
            simulation.spawn(viewport, &mut random);
        }

        for _ in 0..10_000 {
            let before: std::collections::HashMap<u64, f64> = simulation
                .particles()
                .iter()
                .map(|particle| (particle.id(), particle.distance_traveled()))
                .collect();
            simulation.tick(viewport);
            for particle in simulation.particles() {
                assert!(particle.distance_traveled() > before[&particle.id()]);
            }
        }
        assert!(simulation.particles().is_empty());
    }

    #[test]
    fn short_and_lowercase_colours() {
        assert_eq!(parse_colour("star_color", "#f0f").unwrap(), (255, 0, 255));
        assert_eq!(parse_colour("star_color", "2eb9df").unwrap(), (46, 185, 223));
    }

    #[test]
    fn invalid_colour() {
        let stars = StarsConfig {
            trail_color: "purple-ish".to_owned(),
            ..StarsConfig::default()
        };
        let error = SimulatorConfig::new(&stars).unwrap_err();

        assert!(matches!(
            error,
            ConfigError::Colour {
                key: "trail_color",
                ..
            }
        ));
        assert!(error.to_string().contains("'purple-ish'"));
    }
}
