//! Built-in scenes: complete 64×64 frames ready for the player.
//!
//! Composed scenes are thin wrappers around a [`CompositeImager`] built
//! from the platform; procedural scenes draw straight into a [`Matrix`].
//!
//! ## Rust concepts
//! - Newtype wrappers that forward a trait to an inner value
//! - `const` lookup tables for shapes and positions
//! - Plain `f32` math with explicit rounding at the pixel boundary
//!
//! [`CompositeImager`]: crate::imagers::CompositeImager
//! [`Matrix`]: crate::matrix::Matrix

mod christmas_tree;
mod composed;
mod pulsing;
mod rotating_square;
mod tetris;

pub use christmas_tree::ChristmasTreeScene;
pub use composed::{BubblegumScene, DefaultScene, RandomScene, TextScene};
pub use pulsing::PulsingScene;
pub use rotating_square::RotatingSquareScene;
pub use tetris::TetrisScene;

use crate::geometry::Dimensions;

/// Every built-in scene draws onto a panel of this size.
pub const SCENE_DIMENSIONS: Dimensions = Dimensions::square(64);
