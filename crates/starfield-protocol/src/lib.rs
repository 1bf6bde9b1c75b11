//! These are all the types that a consumer of Starfield frames needs.
//!
//! A frame is a complete, self-contained description of one rendered tick of the shooting
//! stars: the viewport it was rendered for, the gradient every star is filled with, and one
//! rotated rectangle per live star. It can be sent as JSON or turned straight into SVG.

#![expect(clippy::pub_use, reason = "This seems to come from the `bon` crate")]

/// An sRGB colour with 8 bits per channel.
pub type Rgb = (u8, u8, u8);

/// One end of the linear gradient that every star is filled with.
#[derive(serde::Serialize, serde::Deserialize, bon::Builder, Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct GradientStop {
    /// Where along the gradient this stop sits, from 0.0 to 1.0.
    pub offset: f64,
    /// The stop's colour.
    pub colour: Rgb,
    /// The stop's opacity, from 0.0 to 1.0.
    pub opacity: f64,
}

/// The gradient shared by all the stars in a scene. It always runs diagonally across each
/// star's bounding box, from the top-left corner to the bottom-right corner.
#[derive(serde::Serialize, serde::Deserialize, bon::Builder, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Gradient {
    /// The document-unique ID that stars reference their fill by.
    pub id: String,
    /// The faded tail of the star.
    pub start: GradientStop,
    /// The bright head of the star.
    pub end: GradientStop,
}

/// A single shooting star, ready to be drawn.
#[derive(serde::Serialize, serde::Deserialize, bon::Builder, Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct StarShape {
    /// The ID of the particle this shape was drawn from. Stable for the particle's lifetime, so
    /// it can be used as a render key.
    pub id: u64,
    /// Left of the unrotated rectangle. [0, 0] is the top-left of the viewport.
    pub x: f64,
    /// Top of the unrotated rectangle.
    pub y: f64,
    /// Width of the rectangle, this grows as the star travels.
    pub width: f64,
    /// Height of the rectangle, this never changes.
    pub height: f64,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
    /// The point the rotation is applied around, the centre of the unrotated rectangle.
    pub origin: (f64, f64),
}

/// Everything needed to draw one frame of the field.
#[derive(serde::Serialize, serde::Deserialize, bon::Builder, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Scene {
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
    /// An optional class that is passed straight through to the containing element.
    pub class_name: Option<String>,
    /// The fill for the stars.
    pub gradient: Gradient,
    /// All the live stars, in the order they were spawned.
    #[builder(default)]
    pub stars: Vec<StarShape>,
}

/// One tick's worth of output.
#[derive(serde::Serialize, serde::Deserialize, bon::Builder, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Frame {
    /// Increments by one for every frame the field renders, starting at 0.
    pub sequence: u64,
    /// The scene itself.
    pub scene: Scene,
}

/// All the message kinds that Starfield can send to its consumers.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OutputMessages {
    /// A newly rendered frame.
    Frame(Frame),
    /// The field has stopped and no more frames will follow.
    Finished {
        /// The total number of frames that were rendered.
        frames: u64,
    },
}
