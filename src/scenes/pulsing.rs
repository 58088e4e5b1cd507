use super::SCENE_DIMENSIONS;
use crate::color::Color;
use crate::imagers::Imager;
use crate::matrix::{Cell, Matrix};

/// Fills the whole panel with one color that walks around the hue wheel
/// while its brightness rises and falls.
///
/// Both cycles span `period` frames, so the animation loops cleanly when
/// the frame counter wraps at the same length.
///
/// # Rust concept: match with guards
/// The triangle wave is a two-armed `match` on which half of the cycle
/// we are in.
#[derive(Clone, Copy, Debug)]
pub struct PulsingScene {
    period: u32,
}

impl PulsingScene {
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(2),
        }
    }

    fn hue(&self, frame: u32) -> u16 {
        ((frame % self.period) as u64 * 360 / self.period as u64) as u16
    }

    /// 0 → 255 → 0 over one period.
    fn brightness(&self, frame: u32) -> u8 {
        let half = self.period as u64 / 2;
        let step = (frame % self.period) as u64;
        let level = match step {
            s if s < half => s * 255 / half,
            s => (self.period as u64 - s) * 255 / (self.period as u64 - half),
        };
        level.min(255) as u8
    }
}

impl Default for PulsingScene {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Imager for PulsingScene {
    fn get_matrix(&mut self, frame: u32, _previous: Option<&Matrix>) -> Matrix {
        let color = Color::from_hue(self.hue(frame));
        Matrix::filled(SCENE_DIMENSIONS, Cell::new(color, self.brightness(frame)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(25, 127)]
    #[case(50, 255)]
    #[case(75, 127)]
    #[case(99, 5)]
    #[case(100, 0)]
    fn brightness_is_a_triangle(#[case] frame: u32, #[case] expected: u8) {
        assert_eq!(PulsingScene::default().brightness(frame), expected);
    }

    #[test]
    fn hue_sweeps_the_wheel() {
        let scene = PulsingScene::default();
        assert_eq!(scene.hue(0), 0);
        assert_eq!(scene.hue(50), 180);
        assert_eq!(scene.hue(99), 356);
    }

    #[test]
    fn panel_is_uniform() {
        let m = PulsingScene::default().get_matrix(30, None);
        let first = m.get(0, 0);
        assert!(m.iter().all(|(c, _, _)| Some(c) == first));
        assert_eq!(first.map(|c| c.color), Some(Color::from_hue(108)));
    }
}
