use super::SCENE_DIMENSIONS;
use crate::color::rgb;
use crate::geometry::{Dimensions, Position};
use crate::imagers::{CompositeImager, ImageFileImager, Imager, RandomImage, TextImager};
use crate::matrix::Matrix;
use crate::platform::Platform;

/// Forwards `get_matrix` to the wrapped composite.
macro_rules! composed_scene {
    ($name:ident) => {
        impl Imager for $name {
            fn get_matrix(&mut self, frame: u32, previous: Option<&Matrix>) -> Matrix {
                self.0.get_matrix(frame, previous)
            }
        }
    };
}

/// The showcase: logo in the middle, a green caption and a patch of
/// noise in the top-left corner.
pub struct DefaultScene(CompositeImager);

impl DefaultScene {
    pub fn new(platform: &Platform) -> Self {
        Self(
            CompositeImager::new(SCENE_DIMENSIONS, rgb(0, 0, 0))
                .add(
                    ImageFileImager::new(platform, "bubblegum.png", Dimensions::square(45)),
                    Position::center(),
                )
                .add(
                    TextImager::styled(platform, "DevTalk", 12, "monospace", rgb(0, 255, 0)),
                    Position::center_horizontal(53),
                )
                .add(RandomImage::new(Dimensions::square(15)), Position::fixed(0, 0)),
        )
    }
}

composed_scene!(DefaultScene);

/// Bubblegum logo with a pink label on dark grey.
pub struct BubblegumScene(CompositeImager);

impl BubblegumScene {
    pub fn new(platform: &Platform) -> Self {
        Self(
            CompositeImager::new(SCENE_DIMENSIONS, rgb(45, 45, 45))
                .add(
                    ImageFileImager::new(platform, "bubblegum.png", Dimensions::square(45)),
                    Position::center(),
                )
                .add(
                    TextImager::styled(platform, "Bubblegum", 10, "monospace", rgb(255, 100, 200)),
                    Position::center_horizontal(55),
                ),
        )
    }
}

composed_scene!(BubblegumScene);

pub struct RandomScene(CompositeImager);

impl RandomScene {
    pub fn new(platform: &Platform) -> Self {
        Self(
            CompositeImager::new(SCENE_DIMENSIONS, rgb(10, 10, 30))
                .add(RandomImage::new(Dimensions::square(50)), Position::center())
                .add(
                    TextImager::styled(platform, "Random", 10, "monospace", rgb(100, 255, 100)),
                    Position::center_horizontal(55),
                ),
        )
    }
}

composed_scene!(RandomScene);

/// Two lines of text: a large centered greeting and a smaller line below.
pub struct TextScene(CompositeImager);

impl TextScene {
    pub fn new(platform: &Platform) -> Self {
        Self(
            CompositeImager::new(SCENE_DIMENSIONS, rgb(20, 20, 40))
                .add(
                    TextImager::styled(platform, "Hello", 20, "serif", rgb(255, 200, 50)),
                    Position::center(),
                )
                .add(
                    TextImager::styled(platform, "World!", 12, "monospace", rgb(50, 200, 255)),
                    Position::center_horizontal(50),
                ),
        )
    }
}

composed_scene!(TextScene);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::matrix::Cell;
    use crate::platform::{MemoryImageLoader, MonoTextRenderer};
    use pretty_assertions::assert_eq;

    fn platform() -> Platform {
        Platform::new(MemoryImageLoader::new(), MonoTextRenderer::new())
    }

    fn count(matrix: &Matrix, color: Color) -> usize {
        matrix.iter().filter(|(c, _, _)| c.color == color).count()
    }

    #[test]
    fn default_scene_layers() {
        let m = DefaultScene::new(&platform()).get_matrix(0, None);
        assert_eq!(m.dimensions(), SCENE_DIMENSIONS);

        // Caption sits at y = 53 and below.
        let caption: Vec<u32> = m
            .iter()
            .filter(|(c, _, _)| c.color == rgb(0, 255, 0))
            .map(|(_, _, y)| y)
            .collect();
        assert!(!caption.is_empty());
        assert!(caption.iter().all(|&y| y >= 53));

        // Noise fades in from the left edge of its 15×15 patch.
        assert_eq!(m.get(0, 0).map(|c| c.brightness), Some(0));
        assert_eq!(m.get(14, 14).map(|c| c.brightness), Some(238));
        assert_eq!(m.get(63, 0), Some(Cell::opaque(Color::BLACK)));
    }

    #[test]
    fn bubblegum_scene_shows_background_while_image_is_missing() {
        let bg = rgb(45, 45, 45);
        let m = BubblegumScene::new(&platform()).get_matrix(0, None);
        assert_eq!(m.get(32, 32), Some(Cell::opaque(bg)));
        assert!(count(&m, rgb(255, 100, 200)) > 0);
    }

    #[test]
    fn random_scene_keeps_its_border() {
        let bg = rgb(10, 10, 30);
        let m = RandomScene::new(&platform()).get_matrix(5, None);
        // The 50×50 noise square starts at 7; the rim stays background.
        for i in 0..64 {
            assert_eq!(m.get(i, 0), Some(Cell::opaque(bg)));
            assert_eq!(m.get(0, i), Some(Cell::opaque(bg)));
        }
        assert!(count(&m, rgb(100, 255, 100)) > 0);
    }

    #[test]
    fn text_scene_draws_both_lines() {
        let m = TextScene::new(&platform()).get_matrix(0, None);
        assert!(count(&m, rgb(255, 200, 50)) > 0);
        assert!(count(&m, rgb(50, 200, 255)) > 0);
        assert_eq!(m.get(0, 0), Some(Cell::opaque(rgb(20, 20, 40))));
    }
}
