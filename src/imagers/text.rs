use super::Imager;
use crate::color::Color;
use crate::geometry::Dimensions;
use crate::matrix::{Cell, Matrix};
use crate::platform::{Platform, TextRenderResult};

/// Rasterized pixels with alpha above this become solid; the rest are dropped.
pub const TEXT_ALPHA_THRESHOLD: u8 = 128;

/// A line of text, rendered once at construction and trimmed to its ink.
///
/// Glyph pixels keep the rendered color; everything else is black so the
/// background shows through when composited. If rendering fails or
/// produces no visible pixels the imager is a single transparent cell.
#[derive(Clone, Debug)]
pub struct TextImager {
    text: String,
    matrix: Matrix,
}

impl TextImager {
    /// White monospace text.
    pub fn new(platform: &Platform, text: impl Into<String>, height: u32) -> Self {
        Self::styled(platform, text, height, "monospace", Color::WHITE)
    }

    pub fn styled(
        platform: &Platform,
        text: impl Into<String>,
        height: u32,
        font_family: &str,
        color: Color,
    ) -> Self {
        let text = text.into();
        let matrix = match platform
            .text_renderer()
            .render_text(&text, height, font_family, color)
        {
            Ok(rendered) => trim_to_ink(&rendered),
            Err(e) => {
                tracing::error!("Failed to render text {:?}: {}", text, e);
                placeholder()
            }
        };
        Self { text, matrix }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn dimensions(&self) -> Dimensions {
        self.matrix.dimensions()
    }
}

fn placeholder() -> Matrix {
    Matrix::new(Dimensions::square(1))
}

fn is_ink(rgba: [u8; 4]) -> bool {
    rgba[3] > TEXT_ALPHA_THRESHOLD
}

/// Tight bounding box `(min_x, min_y, max_x, max_y)` of inked pixels.
fn ink_bounds(rendered: &TextRenderResult) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..rendered.height {
        for x in 0..rendered.width {
            if !rendered.pixel(x, y).is_some_and(is_ink) {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

fn trim_to_ink(rendered: &TextRenderResult) -> Matrix {
    let Some((min_x, min_y, max_x, max_y)) = ink_bounds(rendered) else {
        return placeholder();
    };

    let dimensions = Dimensions::new(max_x - min_x + 1, max_y - min_y + 1);
    Matrix::from_fn(dimensions, |x, y| match rendered.pixel(x + min_x, y + min_y) {
        Some(px @ [r, g, b, _]) if is_ink(px) => Cell::opaque(Color::new(r, g, b)),
        _ => Cell::TRANSPARENT,
    })
}

impl Imager for TextImager {
    fn get_matrix(&mut self, _frame: u32, _previous: Option<&Matrix>) -> Matrix {
        self.matrix.clone()
    }
}
