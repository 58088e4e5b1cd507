use super::SCENE_DIMENSIONS;
use crate::color::{Color, rgb};
use crate::imagers::Imager;
use crate::matrix::{Cell, Matrix};
use std::collections::BTreeMap;

const GRID_WIDTH: i32 = 10;
const GRID_HEIGHT: i32 = 10;
const GRID_OFFSET_X: i32 = 7;
const GRID_OFFSET_Y: i32 = 13;
/// Pixels per grid block, on each axis.
const SCALE: i32 = 5;
const SPAWN_INTERVAL: u32 = 20;
/// Frames between one-row drops.
const FALL_SPEED: u32 = 3;
const PIECE_COUNT: usize = 5;
const FLASH_FRAMES: u32 = 5;

const BORDER: Color = rgb(100, 100, 150);
const TITLE: Color = Color::WHITE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tetromino {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Tetromino {
    const SEQUENCE: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::O,
        Tetromino::T,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::J,
        Tetromino::L,
    ];

    fn blocks(self) -> [(i32, i32); 4] {
        match self {
            Tetromino::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
            Tetromino::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            Tetromino::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
            Tetromino::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
            Tetromino::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
            Tetromino::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
            Tetromino::L => [(2, 0), (0, 1), (1, 1), (2, 1)],
        }
    }

    fn color(self) -> Color {
        match self {
            Tetromino::I => rgb(0, 255, 255),
            Tetromino::O => rgb(255, 255, 0),
            Tetromino::T => rgb(128, 0, 128),
            Tetromino::S => rgb(0, 255, 0),
            Tetromino::Z => rgb(255, 0, 0),
            Tetromino::J => rgb(0, 0, 255),
            Tetromino::L => rgb(255, 165, 0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Piece {
    kind: Tetromino,
    x: i32,
    y: i32,
    landed: bool,
}

impl Piece {
    fn spawn(kind: Tetromino) -> Self {
        Self {
            kind,
            x: 4,
            y: -2,
            landed: false,
        }
    }

    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .blocks()
            .into_iter()
            .map(|(bx, by)| (self.x + bx, self.y + by))
    }
}

/// Full rows waiting to be removed, and the frame their flash started.
#[derive(Clone, Debug)]
struct LineClear {
    rows: Vec<i32>,
    start: u32,
}

/// A scripted game of Tetris: five pieces drop in turn, stack up, and
/// any completed row flashes before it is cleared.
///
/// The game is deterministic and starts over whenever it is asked for
/// frame 0.
#[derive(Clone, Debug)]
pub struct TetrisScene {
    pieces: Vec<Piece>,
    /// Grid position → block color.
    settled: BTreeMap<(i32, i32), Color>,
    clearing: Option<LineClear>,
}

impl TetrisScene {
    pub fn new() -> Self {
        Self {
            pieces: Self::initial_pieces(),
            settled: BTreeMap::new(),
            clearing: None,
        }
    }

    fn initial_pieces() -> Vec<Piece> {
        Tetromino::SEQUENCE
            .iter()
            .cycle()
            .take(PIECE_COUNT)
            .map(|&kind| Piece::spawn(kind))
            .collect()
    }

    fn reset(&mut self) {
        self.pieces = Self::initial_pieces();
        self.settled.clear();
        self.clearing = None;
    }

    /// Pieces that have spawned by `frame`, with their spawn frame.
    fn spawned(&self, frame: u32) -> impl Iterator<Item = (usize, u32)> + '_ {
        (0..self.pieces.len())
            .map(|i| (i, i as u32 * SPAWN_INTERVAL))
            .take_while(move |&(_, start)| frame >= start)
    }

    fn update(&mut self, frame: u32) {
        let active: Vec<(usize, u32)> = self.spawned(frame).collect();
        for (i, start) in active {
            if self.pieces[i].landed {
                continue;
            }
            let since_spawn = frame - start;
            if since_spawn % FALL_SPEED != 0 {
                continue;
            }
            self.pieces[i].y = (since_spawn / FALL_SPEED) as i32 - 2;
            if self.should_land(&self.pieces[i]) {
                self.pieces[i].landed = true;
                let piece = self.pieces[i];
                self.settle(&piece);
                self.check_for_lines(frame);
            }
        }
    }

    fn should_land(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .any(|(x, y)| y + 1 >= GRID_HEIGHT || self.settled.contains_key(&(x, y + 1)))
    }

    fn settle(&mut self, piece: &Piece) {
        let color = piece.kind.color();
        for (x, y) in piece.cells().filter(|&(_, y)| y >= 0) {
            self.settled.insert((x, y), color);
        }
    }

    fn check_for_lines(&mut self, frame: u32) {
        let rows: Vec<i32> = (0..GRID_HEIGHT)
            .filter(|&y| (0..GRID_WIDTH).all(|x| self.settled.contains_key(&(x, y))))
            .collect();
        if !rows.is_empty() {
            self.clearing = Some(LineClear {
                rows,
                start: frame + 1,
            });
        }
    }

    /// Drop the flashed rows and shift everything above them down.
    fn clear_lines(&mut self, rows: &[i32]) {
        self.settled = std::mem::take(&mut self.settled)
            .into_iter()
            .filter(|((_, y), _)| !rows.contains(y))
            .map(|((x, y), color)| {
                let below = rows.iter().filter(|&&row| row > y).count() as i32;
                ((x, y + below), color)
            })
            .collect();
    }

    fn draw(&self, matrix: &mut Matrix, frame: u32) {
        draw_borders(matrix);

        for (&(x, y), &color) in &self.settled {
            draw_block(matrix, x, y, color);
        }

        if let Some(clear) = &self.clearing {
            if (clear.start..clear.start + FLASH_FRAMES).contains(&frame) {
                let flash = if (frame - clear.start) % 2 == 0 {
                    Color::WHITE
                } else {
                    rgb(255, 255, 0)
                };
                for &row in &clear.rows {
                    for x in 0..GRID_WIDTH {
                        draw_block(matrix, x, row, flash);
                    }
                }
            }
        }

        for (i, _) in self.spawned(frame) {
            let piece = &self.pieces[i];
            if piece.landed {
                continue;
            }
            let color = piece.kind.color();
            for (x, y) in piece.cells().filter(|&(_, y)| y >= 0) {
                draw_block(matrix, x, y, color);
            }
        }

        draw_title(matrix);
    }
}

impl Default for TetrisScene {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_block(matrix: &mut Matrix, grid_x: i32, grid_y: i32, color: Color) {
    let cell = Cell::opaque(color);
    let sx = GRID_OFFSET_X + grid_x * SCALE;
    let sy = GRID_OFFSET_Y + grid_y * SCALE;
    for dy in 0..SCALE {
        for dx in 0..SCALE {
            matrix.set(sx + dx, sy + dy, cell);
        }
    }
}

fn draw_borders(matrix: &mut Matrix) {
    let cell = Cell::opaque(BORDER);
    let right = GRID_OFFSET_X + GRID_WIDTH * SCALE;
    let bottom = GRID_OFFSET_Y + GRID_HEIGHT * SCALE;
    for y in GRID_OFFSET_Y..bottom {
        matrix.set(GRID_OFFSET_X - 1, y, cell);
        matrix.set(right, y, cell);
    }
    for x in GRID_OFFSET_X - 1..=right {
        matrix.set(x, bottom, cell);
    }
}

/// 5×5 bitmaps, one `u8` per row with the leftmost pixel in bit 4.
fn glyph(c: char) -> Option<[u8; 5]> {
    match c {
        'T' => Some([0b11111, 0b00100, 0b00100, 0b00100, 0b00100]),
        'E' => Some([0b11111, 0b10000, 0b11110, 0b10000, 0b11111]),
        'R' => Some([0b11110, 0b10001, 0b11110, 0b10100, 0b10010]),
        'I' => Some([0b11111, 0b00100, 0b00100, 0b00100, 0b11111]),
        'S' => Some([0b01111, 0b10000, 0b01110, 0b00001, 0b11110]),
        _ => None,
    }
}

fn draw_title(matrix: &mut Matrix) {
    let cell = Cell::opaque(TITLE);
    let mut left = 17;
    for rows in "TETRIS".chars().filter_map(glyph) {
        for (ly, bits) in rows.iter().enumerate() {
            for lx in 0..5 {
                if bits & (0b10000 >> lx) != 0 {
                    matrix.set(left + lx, 5 + ly as i32, cell);
                }
            }
        }
        left += 6;
    }
}

impl Imager for TetrisScene {
    fn get_matrix(&mut self, frame: u32, _previous: Option<&Matrix>) -> Matrix {
        if frame == 0 {
            self.reset();
        }

        self.update(frame);

        let mut matrix = Matrix::filled(SCENE_DIMENSIONS, Cell::new(Color::BLACK, 0));
        self.draw(&mut matrix, frame);

        // The completed rows stay visible for one frame after the flash.
        if let Some(clear) = &self.clearing {
            if frame == clear.start + FLASH_FRAMES {
                let rows = clear.rows.clone();
                self.clear_lines(&rows);
                self.clearing = None;
            }
        }
        matrix
    }
}
