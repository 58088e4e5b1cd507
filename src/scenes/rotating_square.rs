use super::SCENE_DIMENSIONS;
use crate::color::{Color, rgb};
use crate::geometry::Coordinates;
use crate::imagers::Imager;
use crate::matrix::{Cell, Matrix};
use std::f32::consts::TAU;

const EDGE: Color = rgb(0, 200, 255);
const FILL: Color = rgb(0, 150, 200);
const FILL_BRIGHTNESS: u8 = 150;

/// Frames for one full turn.
const FRAMES_PER_TURN: f32 = 100.0;

/// An outlined square spinning about the panel center.
#[derive(Clone, Copy, Debug)]
pub struct RotatingSquareScene {
    size: f32,
    center: (f32, f32),
}

impl RotatingSquareScene {
    pub fn new() -> Self {
        Self {
            size: 35.0,
            center: (32.0, 32.0),
        }
    }

    /// Corners after rotating by the angle for `frame`, rounded to pixels.
    fn corners(&self, frame: u32) -> [Coordinates; 4] {
        let angle = frame as f32 / FRAMES_PER_TURN * TAU;
        let (sin, cos) = angle.sin_cos();
        let half = self.size / 2.0;
        let (cx, cy) = self.center;

        [(-half, -half), (half, -half), (half, half), (-half, half)].map(|(x, y)| {
            Coordinates::new(
                (x * cos - y * sin + cx).round() as i32,
                (x * sin + y * cos + cy).round() as i32,
            )
        })
    }
}

impl Default for RotatingSquareScene {
    fn default() -> Self {
        Self::new()
    }
}

/// Bresenham line; off-grid points are dropped by `Matrix::set`.
fn draw_line(matrix: &mut Matrix, from: Coordinates, to: Coordinates, cell: Cell) {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (from.x, from.y);

    loop {
        matrix.set(x, y, cell);
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Even-odd ray casting test.
fn contains(polygon: &[Coordinates], x: i32, y: i32) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > y) != (b.y > y) {
            let cross = (b.x - a.x) as f32 * (y - a.y) as f32 / (b.y - a.y) as f32 + a.x as f32;
            if (x as f32) < cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn fill_polygon(matrix: &mut Matrix, polygon: &[Coordinates], cell: Cell) {
    let max_x = matrix.width() as i32 - 1;
    let max_y = matrix.height() as i32 - 1;
    let min_x = polygon.iter().map(|c| c.x).min().unwrap_or(0).max(0);
    let hi_x = polygon.iter().map(|c| c.x).max().unwrap_or(0).min(max_x);
    let min_y = polygon.iter().map(|c| c.y).min().unwrap_or(0).max(0);
    let hi_y = polygon.iter().map(|c| c.y).max().unwrap_or(0).min(max_y);

    for y in min_y..=hi_y {
        for x in min_x..=hi_x {
            if contains(polygon, x, y) {
                matrix.set(x, y, cell);
            }
        }
    }
}

impl Imager for RotatingSquareScene {
    fn get_matrix(&mut self, frame: u32, _previous: Option<&Matrix>) -> Matrix {
        let mut matrix = Matrix::new(SCENE_DIMENSIONS);
        let corners = self.corners(frame);

        let edge = Cell::opaque(EDGE);
        for i in 0..corners.len() {
            draw_line(&mut matrix, corners[i], corners[(i + 1) % corners.len()], edge);
        }
        fill_polygon(&mut matrix, &corners, Cell::new(FILL, FILL_BRIGHTNESS));

        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn frame_zero_is_axis_aligned() {
        let corners = RotatingSquareScene::new().corners(0);
        let xs: Vec<i32> = corners.iter().map(|c| c.x).collect();
        let ys: Vec<i32> = corners.iter().map(|c| c.y).collect();
        // 32 ± 17.5 rounds half away from zero.
        assert_eq!(xs, vec![15, 50, 50, 15]);
        assert_eq!(ys, vec![15, 15, 50, 50]);
    }

    #[test]
    fn outline_and_fill_colors() {
        let m = RotatingSquareScene::new().get_matrix(0, None);
        assert_eq!(m.get(32, 32), Some(Cell::new(FILL, FILL_BRIGHTNESS)));
        // The fill covers the top and left edges; bottom and right stay outlined.
        assert_eq!(m.get(15, 15), Some(Cell::new(FILL, FILL_BRIGHTNESS)));
        assert_eq!(m.get(50, 50), Some(Cell::opaque(EDGE)));
        assert_eq!(m.get(32, 50), Some(Cell::opaque(EDGE)));
        assert_eq!(m.get(0, 0), Some(Cell::TRANSPARENT));
    }

    #[test]
    fn rotated_square_stays_centered() {
        let m = RotatingSquareScene::new().get_matrix(12, None);
        assert_eq!(m.get(32, 32).map(|c| c.color), Some(FILL));
        assert_eq!(m.get(0, 0), Some(Cell::TRANSPARENT));
    }
}
