//! Imagers: anything that produces a [`Matrix`] for a frame.
//!
//! ## Rust concepts
//! - A small trait as the one seam every visual element plugs into
//! - `Box<dyn Imager>` for heterogeneous layers and scene lists
//! - `&mut self` so implementations may keep cached state between frames

mod composite;
mod image_file;
mod random;
mod text;

pub use composite::{CompositeImager, Layer};
pub use image_file::ImageFileImager;
pub use random::RandomImage;
pub use text::{TEXT_ALPHA_THRESHOLD, TextImager};

use crate::matrix::Matrix;

/// Produces the pixels for one frame.
///
/// `frame` counts up from 0 and wraps at the animation length;
/// `previous` is the matrix this imager's consumer received last time
/// (`None` on the first frame or right after a scene switch).
pub trait Imager: Send {
    fn get_matrix(&mut self, frame: u32, previous: Option<&Matrix>) -> Matrix;
}

impl<I: Imager + ?Sized> Imager for Box<I> {
    fn get_matrix(&mut self, frame: u32, previous: Option<&Matrix>) -> Matrix {
        (**self).get_matrix(frame, previous)
    }
}

