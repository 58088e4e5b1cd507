//! Anti-aliased text rasterization from TrueType/OpenType fonts via `fontdue`.

use super::{RawImageData, TextRenderResult, TextRenderer};
use crate::color::Color;
use crate::error::{ImagerError, Result};
use fontdue::{Font, FontSettings};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const PADDING: i32 = 2;

/// Renders text with scalable fonts registered by family name.
///
/// Family lookup is case-insensitive. Unknown families fall back to the
/// first registered font so a typo in a scene degrades to a different
/// face instead of no text.
#[derive(Default)]
pub struct FontdueTextRenderer {
    fonts: BTreeMap<String, Font>,
    default_family: Option<String>,
}

impl FontdueTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every `.ttf`/`.otf` file in `dir`, using the file stem as
    /// the family name (`fonts/serif.ttf` → `serif`).
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut renderer = Self::new();
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf"))
            })
            .collect();
        paths.sort();

        for path in paths {
            let Some(family) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let bytes = fs::read(&path)?;
            if let Err(e) = renderer.add_font(family, &bytes) {
                tracing::warn!("Skipping font {}: {}", path.display(), e);
            }
        }

        tracing::info!("Loaded {} fonts from {}", renderer.fonts.len(), dir.display());
        Ok(renderer)
    }

    pub fn add_font(&mut self, family: &str, bytes: &[u8]) -> Result<()> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| ImagerError::text_render(format!("invalid font {family}: {e}")))?;
        let key = family.to_ascii_lowercase();
        if self.default_family.is_none() {
            self.default_family = Some(key.clone());
        }
        self.fonts.insert(key, font);
        Ok(())
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    fn font_for(&self, family: &str) -> Option<&Font> {
        self.fonts
            .get(&family.to_ascii_lowercase())
            .or_else(|| self.default_family.as_ref().and_then(|f| self.fonts.get(f)))
    }
}

impl TextRenderer for FontdueTextRenderer {
    fn render_text(
        &self,
        text: &str,
        font_size_px: u32,
        font_family: &str,
        color: Color,
    ) -> Result<TextRenderResult> {
        let font = self
            .font_for(font_family)
            .ok_or_else(|| ImagerError::text_render("no fonts registered"))?;
        let px = font_size_px as f32;

        // Measure
        let mut total_width: i32 = 0;
        let mut max_ascent: i32 = 0;
        let mut max_descent: i32 = 0;
        for ch in text.chars() {
            let metrics = font.metrics(ch, px);
            max_ascent = max_ascent.max(metrics.height as i32 + metrics.ymin);
            max_descent = max_descent.max(-metrics.ymin);
            total_width += metrics.advance_width.ceil() as i32;
        }

        let width = (total_width + PADDING * 2).max(1) as u32;
        let height = (max_ascent + max_descent + PADDING * 2).max(1) as u32;
        let mut out = RawImageData::blank(width, height);

        let mut cursor_x = PADDING as f32;
        for ch in text.chars() {
            let (metrics, bitmap) = font.rasterize(ch, px);
            let glyph_x = cursor_x.round() as i32 + metrics.xmin;
            let glyph_y = PADDING + max_ascent - (metrics.height as i32 + metrics.ymin);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    let x = glyph_x + gx as i32;
                    let y = glyph_y + gy as i32;
                    if coverage == 0 || x < 0 || y < 0 {
                        continue;
                    }
                    out.put(x as u32, y as u32, [color.r, color.g, color.b, coverage]);
                }
            }
            cursor_x += metrics.advance_width;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb;
    use crate::imagers::{Imager, TextImager};
    use crate::platform::{MemoryImageLoader, Platform};
    use tempfile::TempDir;

    const MONO_TTF: &[u8] = include_bytes!("../../tests/data/DejaVuSansMono.ttf");

    fn mono_renderer() -> FontdueTextRenderer {
        let mut renderer = FontdueTextRenderer::new();
        renderer.add_font("DejaVuSansMono", MONO_TTF).unwrap();
        renderer
    }

    /// Inked `(x, y)` positions, i.e. pixels with any coverage.
    fn ink(rendered: &TextRenderResult) -> Vec<(u32, u32)> {
        let mut pixels = Vec::new();
        for y in 0..rendered.height {
            for x in 0..rendered.width {
                if rendered.pixel(x, y).is_some_and(|px| px[3] > 0) {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }

    #[test]
    fn renders_glyphs_inside_the_padding() {
        let color = rgb(255, 200, 50);
        let rendered = mono_renderer()
            .render_text("Hi", 16, "DejaVuSansMono", color)
            .unwrap();
        let pad = PADDING as u32;
        let pixels = ink(&rendered);
        assert!(!pixels.is_empty());

        for &(x, y) in &pixels {
            assert!((pad..rendered.width - pad).contains(&x), "x {x} in padding");
            assert!((pad..rendered.height - pad).contains(&y), "y {y} in padding");
            let [r, g, b, _] = rendered.pixel(x, y).unwrap();
            assert_eq!(Color::new(r, g, b), color);
        }

        // Both glyphs sit on the baseline, which is the last row above the padding.
        let bottom = pixels.iter().map(|&(_, y)| y).max();
        assert_eq!(bottom, Some(rendered.height - pad - 1));
    }

    #[test]
    fn pen_advances_between_glyphs() {
        let rendered = mono_renderer()
            .render_text("..", 16, "monospace", Color::WHITE)
            .unwrap();
        let pixels = ink(&rendered);
        let columns: Vec<bool> = (0..rendered.width)
            .map(|x| pixels.iter().any(|&(px, _)| px == x))
            .collect();
        // Count separate runs of inked columns: one per glyph.
        let runs = columns
            .windows(2)
            .filter(|pair| !pair[0] && pair[1])
            .count()
            + usize::from(columns.first() == Some(&true));
        assert_eq!(runs, 2);
    }

    #[test]
    fn text_imager_trims_fontdue_output() {
        let platform = Platform::new(MemoryImageLoader::new(), mono_renderer());
        let color = rgb(50, 200, 255);
        let mut imager = TextImager::styled(&platform, "Hi", 16, "monospace", color);

        let dimensions = imager.dimensions();
        assert!(dimensions.width > 1 && dimensions.height > 1);
        let matrix = imager.get_matrix(0, None);
        assert!(matrix.iter().any(|(cell, _, _)| cell.color == color));
        // Trimmed to the ink: the first and last columns both carry glyph pixels.
        let last = dimensions.width - 1;
        assert!(matrix.iter().any(|(cell, x, _)| x == 0 && cell.color == color));
        assert!(matrix.iter().any(|(cell, x, _)| x == last && cell.color == color));
    }

    #[test]
    fn rendering_without_fonts_fails() {
        let err = FontdueTextRenderer::new()
            .render_text("Hello", 12, "serif", Color::WHITE)
            .unwrap_err();
        assert!(matches!(err, ImagerError::TextRender(_)));
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let mut renderer = FontdueTextRenderer::new();
        assert!(renderer.add_font("broken", b"not a font").is_err());
        assert_eq!(renderer.families().count(), 0);
    }

    #[test]
    fn from_dir_skips_non_font_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("readme.txt"), b"hi").unwrap();
        std::fs::write(tmp.path().join("bad.ttf"), b"garbage").unwrap();

        let renderer = FontdueTextRenderer::from_dir(tmp.path()).unwrap();
        assert_eq!(renderer.families().count(), 0);
    }

    #[test]
    fn from_missing_dir_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("fonts");
        assert!(matches!(
            FontdueTextRenderer::from_dir(&missing),
            Err(ImagerError::Io(_))
        ));
    }
}
