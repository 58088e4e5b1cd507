use super::Imager;
use crate::color::Color;
use crate::geometry::{Dimensions, Position};
use crate::matrix::{Cell, Matrix};

/// One placed element of a [`CompositeImager`].
pub struct Layer {
    pub imager: Box<dyn Imager>,
    pub position: Position,
    /// Crops the layer to this size when set; otherwise the layer's own
    /// matrix size is used.
    pub dimensions: Option<Dimensions>,
}

impl Layer {
    pub fn new(imager: impl Imager + 'static, position: Position) -> Self {
        Self {
            imager: Box::new(imager),
            position,
            dimensions: None,
        }
    }

    pub fn sized(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

/// Stacks layers over a solid background.
///
/// Layers are drawn in insertion order, so later layers cover earlier
/// ones. Black cells in a layer are treated as holes: whatever is below
/// shows through regardless of their brightness. Anything falling
/// outside the composite's own grid is clipped.
///
/// ```
/// use led_imager::{CompositeImager, Imager, Position, RandomImage, Dimensions, rgb};
///
/// let mut scene = CompositeImager::new(Dimensions::square(64), rgb(45, 45, 45))
///     .add(RandomImage::new(Dimensions::square(15)), Position::center());
/// assert_eq!(scene.get_matrix(0, None).dimensions(), Dimensions::square(64));
/// ```
pub struct CompositeImager {
    dimensions: Dimensions,
    background: Color,
    layers: Vec<Layer>,
}

impl CompositeImager {
    pub fn new(dimensions: Dimensions, background: Color) -> Self {
        Self {
            dimensions,
            background,
            layers: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn background(&self) -> Color {
        self.background
    }

    // ── Builder ─────────────────────────────────────────────────────────

    pub fn add(mut self, imager: impl Imager + 'static, position: Position) -> Self {
        self.push(imager, position);
        self
    }

    pub fn add_sized(
        mut self,
        imager: impl Imager + 'static,
        position: Position,
        dimensions: Dimensions,
    ) -> Self {
        self.push_sized(imager, position, dimensions);
        self
    }

    pub fn add_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    // ── In-place editing ────────────────────────────────────────────────

    pub fn push(&mut self, imager: impl Imager + 'static, position: Position) {
        self.layers.push(Layer::new(imager, position));
    }

    pub fn push_sized(
        &mut self,
        imager: impl Imager + 'static,
        position: Position,
        dimensions: Dimensions,
    ) {
        self.layers
            .push(Layer::new(imager, position).sized(dimensions));
    }

    /// Remove and return the topmost layer.
    pub fn pop(&mut self) -> Option<Layer> {
        self.layers.pop()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl Default for CompositeImager {
    fn default() -> Self {
        Self::new(Dimensions::square(64), Color::BLACK)
    }
}

/// Copy the non-black cells of `source` onto `target` at `origin`,
/// limited to `extent` and to both grids' bounds.
fn blit(target: &mut Matrix, source: &Matrix, origin: (i32, i32), extent: Dimensions) {
    let width = extent.width.min(source.width());
    let height = extent.height.min(source.height());

    for ly in 0..height as i32 {
        for lx in 0..width as i32 {
            let Some(cell) = source.get(lx, ly) else {
                continue;
            };
            if cell.color.is_transparent() {
                continue;
            }
            // Off-grid writes are refused by `set`.
            target.set(origin.0 + lx, origin.1 + ly, cell);
        }
    }
}

impl Imager for CompositeImager {
    fn get_matrix(&mut self, frame: u32, previous: Option<&Matrix>) -> Matrix {
        let mut result = Matrix::filled(self.dimensions, Cell::opaque(self.background));

        for layer in &mut self.layers {
            let layer_matrix = layer.imager.get_matrix(frame, previous);
            let extent = layer.dimensions.unwrap_or(layer_matrix.dimensions());
            let origin = layer.position.calculate(self.dimensions, extent);
            blit(&mut result, &layer_matrix, (origin.x, origin.y), extent);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb;
    use crate::imagers::RandomImage;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Fixed-size solid block.
    struct Solid {
        dimensions: Dimensions,
        cell: Cell,
    }

    impl Solid {
        fn new(width: u32, height: u32, color: Color) -> Self {
            Self {
                dimensions: Dimensions::new(width, height),
                cell: Cell::new(color, 200),
            }
        }
    }

    impl Imager for Solid {
        fn get_matrix(&mut self, _frame: u32, _previous: Option<&Matrix>) -> Matrix {
            Matrix::filled(self.dimensions, self.cell)
        }
    }

    /// Records the frames it was asked for.
    struct FrameProbe(std::sync::Arc<std::sync::Mutex<Vec<u32>>>);

    impl Imager for FrameProbe {
        fn get_matrix(&mut self, frame: u32, _previous: Option<&Matrix>) -> Matrix {
            self.0.lock().unwrap().push(frame);
            Matrix::new(Dimensions::square(1))
        }
    }

    #[test]
    fn zero_layers_is_pure_background() {
        let bg = rgb(45, 45, 45);
        let m = CompositeImager::new(Dimensions::new(8, 4), bg).get_matrix(0, None);
        assert_eq!(m.dimensions(), Dimensions::new(8, 4));
        assert!(m.iter().all(|(c, _, _)| c == Cell::opaque(bg)));
    }

    #[test]
    fn default_is_black_64_square() {
        let composite = CompositeImager::default();
        assert_eq!(composite.dimensions(), Dimensions::square(64));
        assert_eq!(composite.background(), Color::BLACK);
        assert_eq!(composite.layer_count(), 0);
    }

    #[test]
    fn all_black_layer_is_noop() {
        let bg = rgb(1, 2, 3);
        let mut composite = CompositeImager::new(Dimensions::square(10), bg)
            .add(Solid::new(10, 10, Color::BLACK), Position::fixed(0, 0));
        let m = composite.get_matrix(0, None);
        assert!(m.iter().all(|(c, _, _)| c == Cell::opaque(bg)));
    }

    #[test]
    fn later_layers_win_and_keep_brightness() {
        let red = rgb(255, 0, 0);
        let blue = rgb(0, 0, 255);
        let mut composite = CompositeImager::new(Dimensions::square(10), Color::BLACK)
            .add(Solid::new(4, 4, red), Position::fixed(0, 0))
            .add(Solid::new(4, 4, blue), Position::fixed(2, 2));
        let m = composite.get_matrix(0, None);

        assert_eq!(m.get(0, 0), Some(Cell::new(red, 200)));
        assert_eq!(m.get(2, 2), Some(Cell::new(blue, 200)));
        assert_eq!(m.get(3, 3), Some(Cell::new(blue, 200)));
        assert_eq!(m.get(5, 5), Some(Cell::new(blue, 200)));
        assert_eq!(m.get(6, 6), Some(Cell::opaque(Color::BLACK)));
    }

    #[test]
    fn override_dimensions_crop_and_position_the_layer() {
        let green = rgb(0, 255, 0);
        let mut composite = CompositeImager::new(Dimensions::square(10), Color::BLACK).add_sized(
            Solid::new(8, 8, green),
            Position::center(),
            Dimensions::square(2),
        );
        let m = composite.get_matrix(0, None);

        let lit: Vec<(u32, u32)> = m
            .iter()
            .filter(|(c, _, _)| c.color == green)
            .map(|(_, x, y)| (x, y))
            .collect();
        assert_eq!(lit, vec![(4, 4), (5, 4), (4, 5), (5, 5)]);
    }

    #[test]
    fn override_larger_than_layer_uses_real_bounds() {
        let green = rgb(0, 255, 0);
        let mut composite = CompositeImager::new(Dimensions::square(10), Color::BLACK).add_sized(
            Solid::new(2, 2, green),
            Position::fixed(0, 0),
            Dimensions::square(6),
        );
        let m = composite.get_matrix(0, None);
        assert_eq!(m.iter().filter(|(c, _, _)| c.color == green).count(), 4);
    }

    #[rstest]
    #[case::left_top(Position::fixed(-2, -2), 4)]
    #[case::right_bottom(Position::fixed(8, 8), 4)]
    #[case::far_away(Position::fixed(100, -100), 0)]
    fn off_grid_layers_are_clipped(#[case] position: Position, #[case] visible: usize) {
        let white = Color::WHITE;
        let mut composite = CompositeImager::new(Dimensions::square(10), Color::BLACK)
            .add(Solid::new(4, 4, white), position);
        let m = composite.get_matrix(0, None);
        assert_eq!(m.dimensions(), Dimensions::square(10));
        assert_eq!(m.iter().filter(|(c, _, _)| c.color == white).count(), visible);
    }

    #[test]
    fn layers_see_the_same_frame() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut composite = CompositeImager::default()
            .add(FrameProbe(seen.clone()), Position::center())
            .add(FrameProbe(seen.clone()), Position::center());
        composite.get_matrix(42, None);
        assert_eq!(*seen.lock().unwrap(), vec![42, 42]);
    }

    #[test]
    fn push_pop_and_clear_edit_the_stack() {
        let mut composite = CompositeImager::default();
        composite.push(RandomImage::default(), Position::center());
        composite.push_sized(
            Solid::new(2, 2, Color::WHITE),
            Position::fixed(1, 1),
            Dimensions::square(1),
        );
        assert_eq!(composite.layer_count(), 2);

        let top = composite.pop().unwrap();
        assert_eq!(top.position, Position::fixed(1, 1));
        assert_eq!(top.dimensions, Some(Dimensions::square(1)));
        assert_eq!(composite.layer_count(), 1);

        composite.clear();
        assert_eq!(composite.layer_count(), 0);
        assert!(composite.pop().is_none());
    }
}
