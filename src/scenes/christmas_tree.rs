use super::SCENE_DIMENSIONS;
use crate::color::{Color, rgb};
use crate::imagers::Imager;
use crate::matrix::{Cell, Matrix};
use std::f32::consts::TAU;

const TREE: Color = rgb(0, 150, 0);
const TRUNK: Color = rgb(139, 69, 19);
const STAR: Color = rgb(255, 215, 0);

const RED: Color = rgb(255, 0, 0);
const YELLOW: Color = rgb(255, 255, 0);
const BLUE: Color = rgb(0, 0, 255);
const WHITE: Color = rgb(255, 255, 255);

const CENTER_X: i32 = 32;
const TREE_TOP: i32 = 10;
const TREE_BOTTOM: i32 = 48;
const TREE_HALF_WIDTH: f32 = 40.0;

/// Frames in one full blink of a light.
const BLINK_PERIOD: u32 = 50;
/// Lights dimmer than this fraction are switched off.
const BLINK_THRESHOLD: f32 = 0.3;

struct Light {
    x: i32,
    y: i32,
    color: Color,
    /// Phase shift in frames, so neighbours twinkle out of step.
    offset: u32,
}

const fn light(x: i32, y: i32, color: Color, offset: u32) -> Light {
    Light {
        x,
        y,
        color,
        offset,
    }
}

const LIGHTS: [Light; 28] = [
    light(32, 12, RED, 0),
    light(28, 16, YELLOW, 15),
    light(36, 16, BLUE, 30),
    light(24, 20, WHITE, 45),
    light(32, 21, RED, 10),
    light(40, 20, YELLOW, 25),
    light(20, 25, BLUE, 40),
    light(28, 26, WHITE, 5),
    light(36, 26, RED, 20),
    light(44, 25, YELLOW, 35),
    light(18, 31, RED, 50),
    light(24, 32, BLUE, 15),
    light(32, 33, YELLOW, 30),
    light(40, 32, WHITE, 45),
    light(46, 31, RED, 10),
    light(16, 37, YELLOW, 25),
    light(22, 38, BLUE, 40),
    light(28, 39, WHITE, 5),
    light(36, 39, RED, 20),
    light(42, 38, YELLOW, 35),
    light(48, 37, BLUE, 50),
    light(14, 43, WHITE, 15),
    light(20, 44, RED, 30),
    light(26, 45, YELLOW, 45),
    light(32, 46, BLUE, 10),
    light(38, 45, WHITE, 25),
    light(44, 44, RED, 40),
    light(50, 43, YELLOW, 5),
];

/// Star outline relative to its center at (32, 6).
const STAR_POINTS: [(i32, i32); 11] = [
    (0, -3),
    (1, -1),
    (3, -1),
    (1, 0),
    (2, 2),
    (0, 1),
    (-2, 2),
    (-1, 0),
    (-3, -1),
    (-1, -1),
    (0, 0),
];

/// A tree with a trunk, a star and twinkling 2×2 lights.
///
/// Each light's brightness follows a sine wave over [`BLINK_PERIOD`]
/// frames and it is only drawn while above [`BLINK_THRESHOLD`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ChristmasTreeScene;

impl ChristmasTreeScene {
    pub fn new() -> Self {
        Self
    }
}

/// Light intensity in `0.0..=1.0` at `frame`.
fn blink(frame: u32, offset: u32) -> f32 {
    let phase = ((frame + offset) % BLINK_PERIOD) as f32 / BLINK_PERIOD as f32;
    (phase * TAU).sin() * 0.5 + 0.5
}

fn draw_tree(matrix: &mut Matrix) {
    let cell = Cell::opaque(TREE);
    for y in TREE_TOP..=TREE_BOTTOM {
        let progress = (y - TREE_TOP) as f32 / (TREE_BOTTOM - TREE_TOP) as f32;
        let half = (progress * TREE_HALF_WIDTH).floor() as i32;
        for dx in -half..=half {
            matrix.set(CENTER_X + dx, y, cell);
        }
    }
}

fn draw_trunk(matrix: &mut Matrix) {
    let cell = Cell::opaque(TRUNK);
    for y in 49..59 {
        for dx in -3..3 {
            matrix.set(CENTER_X + dx, y, cell);
        }
    }
}

fn draw_star(matrix: &mut Matrix) {
    let cell = Cell::opaque(STAR);
    for (dx, dy) in STAR_POINTS {
        matrix.set(CENTER_X + dx, 6 + dy, cell);
    }
}

fn draw_lights(matrix: &mut Matrix, frame: u32) {
    for light in &LIGHTS {
        let intensity = blink(frame, light.offset);
        if intensity <= BLINK_THRESHOLD {
            continue;
        }
        let cell = Cell::new(light.color, (intensity * 255.0).floor() as u8);
        for dy in 0..2 {
            for dx in 0..2 {
                matrix.set(light.x + dx, light.y + dy, cell);
            }
        }
    }
}

impl Imager for ChristmasTreeScene {
    fn get_matrix(&mut self, frame: u32, _previous: Option<&Matrix>) -> Matrix {
        let mut matrix = Matrix::new(SCENE_DIMENSIONS);
        draw_tree(&mut matrix);
        draw_trunk(&mut matrix);
        draw_star(&mut matrix);
        draw_lights(&mut matrix, frame);
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.5)]
    #[case(12, 0.9982)]
    #[case(25, 0.5)]
    #[case(37, 0.0018)]
    fn blink_follows_sine(#[case] frame: u32, #[case] expected: f32) {
        assert!((blink(frame, 0) - expected).abs() < 0.01);
    }

    #[test]
    fn static_parts_are_drawn() {
        let m = ChristmasTreeScene::new().get_matrix(0, None);
        assert_eq!(m.get(32, 3), Some(Cell::opaque(STAR)));
        assert_eq!(m.get(32, 10), Some(Cell::opaque(TREE)));
        assert_eq!(m.get(0, 48), Some(Cell::opaque(TREE)));
        assert_eq!(m.get(29, 58), Some(Cell::opaque(TRUNK)));
        assert_eq!(m.get(35, 58), Some(Cell::opaque(Color::BLACK)));
        assert_eq!(m.get(0, 0), Some(Cell::opaque(Color::BLACK)));
    }

    #[test]
    fn lights_twinkle() {
        let mut scene = ChristmasTreeScene::new();
        // Top red light (offset 0): bright at frame 12, off at frame 37.
        let on = scene.get_matrix(12, None);
        assert_eq!(on.get(32, 12).map(|c| c.color), Some(RED));
        assert_eq!(on.get(33, 13).map(|c| c.brightness), Some(254));

        let off = scene.get_matrix(37, None);
        assert_eq!(off.get(32, 12), Some(Cell::opaque(TREE)));
    }
}
