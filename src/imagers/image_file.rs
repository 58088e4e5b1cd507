use super::Imager;
use crate::color::Color;
use crate::converter::ImageToMatrixConverter;
use crate::geometry::Dimensions;
use crate::matrix::{Cell, Matrix};
use crate::platform::Platform;

/// Shows an image asset scaled to fit inside `max_dimensions`.
///
/// Loading happens in the background. Until it finishes (or if it fails)
/// the imager returns a black, i.e. fully transparent, matrix of
/// `max_dimensions`; afterwards the matrix has the scaled image's size.
pub struct ImageFileImager {
    converter: ImageToMatrixConverter,
    max_dimensions: Dimensions,
}

impl ImageFileImager {
    pub fn new(platform: &Platform, path: impl Into<String>, max_dimensions: Dimensions) -> Self {
        Self {
            converter: ImageToMatrixConverter::new(platform.image_loader(), path, max_dimensions),
            max_dimensions,
        }
    }

    /// Same as [`new`](Self::new) with the full 64×64 panel as the limit.
    pub fn full_panel(platform: &Platform, path: impl Into<String>) -> Self {
        Self::new(platform, path, Dimensions::square(64))
    }

    pub fn converter(&self) -> &ImageToMatrixConverter {
        &self.converter
    }
}

impl Imager for ImageFileImager {
    fn get_matrix(&mut self, _frame: u32, _previous: Option<&Matrix>) -> Matrix {
        let dimensions = self
            .converter
            .scaled_dimensions()
            .unwrap_or(self.max_dimensions);

        Matrix::from_fn(dimensions, |x, y| {
            let color = self
                .converter
                .pixel_color(x as i32, y as i32)
                .unwrap_or(Color::BLACK);
            Cell::opaque(color)
        })
    }
}
