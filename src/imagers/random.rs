use super::Imager;
use crate::color::Color;
use crate::geometry::Dimensions;
use crate::matrix::{Cell, Matrix};

/// Noise: a fresh random color per cell every frame, fading from dark on
/// the left edge to bright on the right.
#[derive(Clone, Copy, Debug)]
pub struct RandomImage {
    dimensions: Dimensions,
}

impl RandomImage {
    pub fn new(dimensions: Dimensions) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

impl Default for RandomImage {
    fn default() -> Self {
        Self::new(Dimensions::square(64))
    }
}

fn ramp(x: u32, width: u32) -> u8 {
    (255 * x as u64 / width.max(1) as u64) as u8
}

impl Imager for RandomImage {
    fn get_matrix(&mut self, _frame: u32, _previous: Option<&Matrix>) -> Matrix {
        let width = self.dimensions.width;
        Matrix::from_fn(self.dimensions, |x, _| Cell::new(Color::random(), ramp(x, width)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn matches_declared_dimensions() {
        let m = RandomImage::new(Dimensions::new(15, 7)).get_matrix(0, None);
        assert_eq!(m.dimensions(), Dimensions::new(15, 7));
    }

    #[test]
    fn brightness_ramps_left_to_right() {
        let m = RandomImage::new(Dimensions::new(4, 2)).get_matrix(3, None);
        let first_row: Vec<u8> = m.rows().next().unwrap().iter().map(|c| c.brightness).collect();
        assert_eq!(first_row, vec![0, 63, 127, 191]);
    }

    #[test]
    fn frames_differ() {
        // 256 random cells matching twice in a row would be astronomically unlikely.
        let mut imager = RandomImage::new(Dimensions::square(16));
        let a = imager.get_matrix(0, None);
        let b = imager.get_matrix(1, Some(&a));
        assert_ne!(a, b);
    }
}
