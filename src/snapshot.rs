//! What the outside world sees of the player: the latest frame and a
//! status summary, kept behind a mutex for HTTP handlers to read.
//!
//! ## Rust concepts
//! - Serde `Serialize` derive for JSON responses
//! - `Arc<Mutex<_>>` shared between the player task and request handlers
//! - `From<&T>` conversions into wire types

use crate::geometry::Dimensions;
use crate::matrix::Matrix;
use crate::player::FrameSink;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ── Wire types ──────────────────────────────────────────────────────

/// Summary of what is on the display right now.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct DisplayStatus {
    /// Name of the scene being shown
    #[schema(example = "DefaultScene")]
    pub scene: String,
    pub scene_index: usize,
    pub scene_count: usize,
    /// Frame last rendered, `0..max_frames`
    pub frame: u32,
    pub max_frames: u32,
    /// Whether the frame clock is ticking
    pub running: bool,
    /// Whether the player moves to the next scene when the frame wraps
    pub cycling: bool,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct CellSnapshot {
    #[schema(example = "rgb(255, 100, 200)")]
    pub color: String,
    pub brightness: u8,
}

/// A frame as JSON: dimensions plus rows of cells, top to bottom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct MatrixSnapshot {
    pub dimensions: Dimensions,
    pub cells: Vec<Vec<CellSnapshot>>,
}

impl From<&Matrix> for MatrixSnapshot {
    fn from(matrix: &Matrix) -> Self {
        let cells = matrix
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| CellSnapshot {
                        color: cell.color.to_string(),
                        brightness: cell.brightness,
                    })
                    .collect()
            })
            .collect();
        Self {
            dimensions: matrix.dimensions(),
            cells,
        }
    }
}

// ── HTML preview ────────────────────────────────────────────────────

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Matrix Display</title>
  <style>
    :root {
      color-scheme: dark;
      background-color: #242424;
    }
    body {
      margin: 0;
      display: flex;
      place-items: center;
      min-height: 100vh;
    }
    .wrapper {
      display: flex;
      flex-direction: column;
      gap: 2px;
      padding: 20px;
      background-color: #1a1a1a;
      width: fit-content;
      margin: 0 auto;
    }
    .row {
      display: flex;
      gap: 2px;
    }
    .cell {
      width: 10px;
      height: 10px;
      background-color: #333;
      border: 1px solid #555;
      box-sizing: border-box;
    }
    .cell:hover {
      border-color: #777;
    }
  </style>
</head>
<body>
  <div class="wrapper">
"#;

const HTML_TAIL: &str = "  </div>\n</body>\n</html>\n";

/// A standalone page drawing `matrix` as a grid of colored squares, with
/// each cell's brightness applied as alpha.
pub fn render_html(matrix: &Matrix) -> String {
    // Roughly 60 bytes per cell.
    let mut html = String::with_capacity(HTML_HEAD.len() + matrix.dimensions().area() * 64);
    html.push_str(HTML_HEAD);
    for row in matrix.rows() {
        html.push_str("    <div class=\"row\">");
        for cell in row {
            let _ = write!(
                html,
                "<div class=\"cell\" style=\"background-color: {};\"></div>",
                cell.css_color()
            );
        }
        html.push_str("</div>\n");
    }
    html.push_str(HTML_TAIL);
    html
}

// ── Shared state ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Snapshot {
    pub status: DisplayStatus,
    pub matrix: Matrix,
}

/// The latest frame, shared between the player and its readers.
///
/// # Rust concept: poisoned locks
/// A panic while holding a `Mutex` poisons it. The data here is always
/// written whole, so readers simply take the inner value back.
#[derive(Clone, Debug)]
pub struct SharedSnapshot(Arc<Mutex<Snapshot>>);

impl SharedSnapshot {
    pub fn new(dimensions: Dimensions) -> Self {
        Self(Arc::new(Mutex::new(Snapshot {
            status: DisplayStatus {
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..DisplayStatus::default()
            },
            matrix: Matrix::new(dimensions),
        })))
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> DisplayStatus {
        self.lock().status.clone()
    }

    pub fn matrix(&self) -> Matrix {
        self.lock().matrix.clone()
    }

    pub fn get(&self) -> Snapshot {
        self.lock().clone()
    }
}

impl FrameSink for SharedSnapshot {
    fn present(&mut self, matrix: &Matrix, status: &DisplayStatus) {
        let mut snapshot = self.lock();
        snapshot.matrix.clone_from(matrix);
        snapshot.status.clone_from(status);
    }
}
