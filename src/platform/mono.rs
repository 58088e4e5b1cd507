//! Text rasterization with the built-in ASCII bitmap fonts from `embedded-graphics`.
//!
//! No font files are needed, which makes this the default renderer on the
//! panel. The same X11 fixed fonts (6x13, 9x18, ...) are what the LED
//! matrix C library ships as BDF files.

use super::{RawImageData, TextRenderResult, TextRenderer};
use crate::color::Color;
use crate::error::Result;
use embedded_graphics::Drawable;
use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::mono_font::ascii::{
    FONT_4X6, FONT_5X7, FONT_5X8, FONT_6X9, FONT_6X10, FONT_6X12, FONT_6X13, FONT_6X13_BOLD,
    FONT_7X13, FONT_7X13_BOLD, FONT_7X14, FONT_7X14_BOLD, FONT_8X13, FONT_8X13_BOLD, FONT_9X15,
    FONT_9X15_BOLD, FONT_9X18, FONT_9X18_BOLD, FONT_10X20,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::text::{Baseline, Text};
use std::convert::Infallible;

/// Padding around the glyphs, matching the canvas renderer's 2px inset.
const PADDING: u32 = 2;

/// Regular fonts ordered by glyph height.
fn regular_fonts() -> [&'static MonoFont<'static>; 13] {
    [
        &FONT_4X6, &FONT_5X7, &FONT_5X8, &FONT_6X9, &FONT_6X10, &FONT_6X12, &FONT_6X13,
        &FONT_7X13, &FONT_7X14, &FONT_8X13, &FONT_9X15, &FONT_9X18, &FONT_10X20,
    ]
}

fn bold_fonts() -> [&'static MonoFont<'static>; 6] {
    [
        &FONT_6X13_BOLD, &FONT_7X13_BOLD, &FONT_7X14_BOLD, &FONT_8X13_BOLD, &FONT_9X15_BOLD,
        &FONT_9X18_BOLD,
    ]
}

/// Renders text with fixed-size bitmap fonts.
///
/// The font family only selects between regular and bold faces; the
/// requested pixel size picks the tallest font that still fits.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoTextRenderer;

impl MonoTextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// The font used for a given size and family.
    pub fn select_font(font_size_px: u32, font_family: &str) -> &'static MonoFont<'static> {
        let wants_bold = font_family.to_ascii_lowercase().contains("bold");
        let fits = |font: &&'static MonoFont<'static>| font.character_size.height <= font_size_px;

        if wants_bold {
            if let Some(font) = bold_fonts().into_iter().rev().find(fits) {
                return font;
            }
        }
        let regular = regular_fonts();
        regular.into_iter().rev().find(fits).unwrap_or(regular[0])
    }
}

/// RGBA buffer that embedded-graphics can draw into.
struct RgbaCanvas(RawImageData);

impl OriginDimensions for RgbaCanvas {
    fn size(&self) -> Size {
        Size::new(self.0.width, self.0.height)
    }
}

impl DrawTarget for RgbaCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 {
                self.0
                    .put(coord.x as u32, coord.y as u32, [color.r(), color.g(), color.b(), 255]);
            }
        }
        Ok(())
    }
}

impl TextRenderer for MonoTextRenderer {
    fn render_text(
        &self,
        text: &str,
        font_size_px: u32,
        font_family: &str,
        color: Color,
    ) -> Result<TextRenderResult> {
        let font = Self::select_font(font_size_px, font_family);
        let advance = font.character_size.width + font.character_spacing;
        let chars = text.chars().count() as u32;

        let width = chars * advance + PADDING * 2;
        let height = font.character_size.height + PADDING * 2;
        let mut canvas = RgbaCanvas(RawImageData::blank(width, height));

        let style = MonoTextStyle::new(font, Rgb888::new(color.r, color.g, color.b));
        let origin = Point::new(PADDING as i32, PADDING as i32);
        // Drawing into an in-memory canvas is infallible.
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut canvas);

        Ok(canvas.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(3, 6)]
    #[case(6, 6)]
    #[case(10, 10)]
    #[case(12, 12)]
    #[case(20, 20)]
    #[case(64, 20)]
    fn picks_tallest_fitting_font(#[case] size: u32, #[case] glyph_height: u32) {
        let font = MonoTextRenderer::select_font(size, "monospace");
        assert_eq!(font.character_size.height, glyph_height);
    }

    fn lit_pixels(out: &RawImageData) -> usize {
        out.data.chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    #[test]
    fn bold_family_draws_heavier_strokes() {
        let renderer = MonoTextRenderer::new();
        let regular = renderer.render_text("M", 13, "monospace", Color::WHITE).unwrap();
        let bold = renderer.render_text("M", 13, "monospace bold", Color::WHITE).unwrap();
        assert_eq!(regular.width, bold.width);
        assert!(lit_pixels(&bold) > lit_pixels(&regular));
    }

    #[test]
    fn renders_opaque_glyph_pixels_in_color() {
        let color = Color::new(0, 255, 0);
        let out = MonoTextRenderer::new()
            .render_text("Hi", 10, "monospace", color)
            .unwrap();

        assert_eq!(out.width, 2 * 6 + 4);
        assert_eq!(out.height, 10 + 4);

        let lit: Vec<[u8; 4]> = out
            .data
            .chunks_exact(4)
            .filter(|px| px[3] > 0)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|px| *px == [0, 255, 0, 255]));

        // Padding rows stay transparent.
        for x in 0..out.width {
            assert_eq!(out.pixel(x, 0).unwrap()[3], 0);
        }
    }

    #[test]
    fn empty_text_renders_nothing_visible() {
        let out = MonoTextRenderer::new()
            .render_text("", 12, "monospace", Color::WHITE)
            .unwrap();
        assert!(out.data.chunks_exact(4).all(|px| px[3] == 0));
    }
}
