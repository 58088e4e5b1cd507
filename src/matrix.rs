//! The pixel buffer: a fixed-size grid of [`Cell`]s addressed by `(x, y)`.
//!
//! Out-of-range reads return `None` and out-of-range writes return `false`;
//! nothing here panics on bad coordinates.

use crate::color::{Color, css_color};
use crate::geometry::Dimensions;

/// One pixel: a color plus a brightness (0 = off, 255 = full).
///
/// Brightness is carried alongside the color and only applied when the
/// frame is displayed, never while compositing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub color: Color,
    pub brightness: u8,
}

impl Cell {
    /// Black at full brightness: what empty matrices are filled with.
    pub const TRANSPARENT: Cell = Cell::opaque(Color::BLACK);

    pub const fn new(color: Color, brightness: u8) -> Self {
        Self { color, brightness }
    }

    pub const fn opaque(color: Color) -> Self {
        Self::new(color, u8::MAX)
    }

    /// Color with brightness folded in, for panel output.
    pub fn display_color(&self) -> Color {
        self.color.apply_brightness(self.brightness)
    }

    /// CSS color for a browser/HTML preview.
    pub fn css_color(&self) -> String {
        css_color(self.color, self.brightness)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// A fixed-size, row-major grid of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    dimensions: Dimensions,
    cells: Vec<Cell>,
}

impl Matrix {
    /// A matrix of transparent black cells.
    pub fn new(dimensions: Dimensions) -> Self {
        Self::filled(dimensions, Cell::TRANSPARENT)
    }

    pub fn filled(dimensions: Dimensions, cell: Cell) -> Self {
        Self {
            dimensions,
            cells: vec![cell; dimensions.area()],
        }
    }

    /// Build every cell from its coordinates.
    pub fn from_fn(dimensions: Dimensions, mut init: impl FnMut(u32, u32) -> Cell) -> Self {
        let mut cells = Vec::with_capacity(dimensions.area());
        for y in 0..dimensions.height {
            for x in 0..dimensions.width {
                cells.push(init(x, y));
            }
        }
        Self { dimensions, cells }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.dimensions
            .contains(x, y)
            .then(|| y as usize * self.dimensions.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Replace the cell at `(x, y)`. Returns `false` (and changes nothing)
    /// when the coordinates are outside the grid.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn fill_with(&mut self, mut init: impl FnMut(u32, u32) -> Cell) {
        let width = self.dimensions.width as usize;
        if width == 0 {
            return;
        }
        for (i, cell) in self.cells.iter_mut().enumerate() {
            *cell = init((i % width) as u32, (i / width) as u32);
        }
    }

    /// Every cell with its coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, u32, u32)> + '_ {
        let width = self.dimensions.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (*cell, (i % width) as u32, (i / width) as u32))
    }

    /// Row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.dimensions.width.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const RED: Cell = Cell::opaque(Color::new(255, 0, 0));

    #[rstest]
    #[case(Dimensions::square(64))]
    #[case(Dimensions::new(15, 3))]
    #[case(Dimensions::new(1, 1))]
    fn get_is_defined_exactly_inside_bounds(#[case] dims: Dimensions) {
        let m = Matrix::new(dims);
        assert_eq!(m.width(), dims.width);
        assert_eq!(m.height(), dims.height);

        let (w, h) = (dims.width as i32, dims.height as i32);
        for y in -1..=h {
            for x in -1..=w {
                let inside = (0..w).contains(&x) && (0..h).contains(&y);
                assert_eq!(m.get(x, y).is_some(), inside, "({x}, {y})");
            }
        }
    }

    #[test]
    fn set_declines_out_of_range() {
        let mut m = Matrix::new(Dimensions::square(4));
        assert!(!m.set(4, 0, RED));
        assert!(!m.set(0, -1, RED));
        assert!(m.iter().all(|(c, _, _)| c == Cell::TRANSPARENT));

        assert!(m.set(3, 3, RED));
        assert_eq!(m.get(3, 3), Some(RED));
    }

    #[test]
    fn from_fn_sees_row_major_coordinates() {
        let m = Matrix::from_fn(Dimensions::new(3, 2), |x, y| {
            Cell::opaque(Color::new(x as u8, y as u8, 0))
        });
        assert_eq!(m.get(2, 1), Some(Cell::opaque(Color::new(2, 1, 0))));

        let coords: Vec<(u32, u32)> = m.iter().map(|(_, x, y)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn fill_rewrites_every_cell() {
        let mut m = Matrix::new(Dimensions::new(5, 3));
        m.fill(RED);
        assert!(m.iter().all(|(c, _, _)| c == RED));

        m.fill_with(|x, _| Cell::new(Color::WHITE, x as u8));
        assert_eq!(m.get(4, 2), Some(Cell::new(Color::WHITE, 4)));
        assert_eq!(m.dimensions(), Dimensions::new(5, 3));
    }

    #[test]
    fn rows_split_by_width() {
        let m = Matrix::new(Dimensions::new(4, 3));
        let rows: Vec<usize> = m.rows().map(|r| r.len()).collect();
        assert_eq!(rows, vec![4, 4, 4]);
    }

    #[test]
    fn display_color_applies_brightness() {
        let cell = Cell::new(Color::new(200, 100, 0), 0);
        assert_eq!(cell.display_color(), Color::BLACK);
        assert_eq!(cell.css_color(), "rgba(200, 100, 0, 0)");
    }
}
