//! Shooting stars that fly in from the edges of a viewport, grow longer as they travel, and are
//! culled once they've left it.

pub mod cli_args;
/// All the user-configurable settings.
pub mod config {
    pub mod main;
    pub mod stars;
}
pub mod errors;
pub mod field;
pub mod output;
pub mod particle;
pub mod random;
pub mod run;
pub mod scene;
pub mod simulation;
pub mod spawner;
pub mod svg;
