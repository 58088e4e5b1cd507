//! Platform ports: image decode+scale and text rasterization.
//!
//! The engine never touches files or fonts directly. It asks an
//! [`ImageLoader`] or [`TextRenderer`] held by a [`Platform`] context,
//! which startup code builds exactly once and hands to every imager that
//! needs assets. Two implementations of each port ship with the crate:
//!
//! | Port           | Implementations                                  |
//! |----------------|--------------------------------------------------|
//! | `ImageLoader`  | [`FileImageLoader`], [`MemoryImageLoader`]       |
//! | `TextRenderer` | [`MonoTextRenderer`], [`FontdueTextRenderer`]    |
//!
//! ## Rust concepts
//! - Trait objects (`Arc<dyn ImageLoader>`) for runtime-selected backends
//! - `Send + Sync` bounds so loaders can run on a background thread
//! - The builder pattern for "configure once, then read-only"

mod file;
mod memory;
mod mono;
mod ttf;

pub use file::FileImageLoader;
pub use memory::MemoryImageLoader;
pub use mono::MonoTextRenderer;
pub use ttf::FontdueTextRenderer;

use crate::color::Color;
use crate::error::{ImagerError, Result};
use crate::geometry::Dimensions;
use image::DynamicImage;
use image::imageops::FilterType;
use std::fmt;
use std::sync::Arc;

// ── Pixel buffers ───────────────────────────────────────────────────

/// Decoded RGBA pixels (4 bytes per pixel, row-major).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImageData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Rasterized text uses the same RGBA layout as decoded images.
pub type TextRenderResult = RawImageData;

impl RawImageData {
    /// A fully transparent buffer.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// RGBA at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = (y as usize * self.width as usize + x as usize) * 4;
            self.data[i..i + 4].copy_from_slice(&rgba);
        }
    }
}

// ── Ports ───────────────────────────────────────────────────────────

/// Decode an image asset and scale it to fit inside `max`.
///
/// This is a blocking call. [`ImageToMatrixConverter`](crate::ImageToMatrixConverter)
/// runs it off the render path so frames never wait on disk or decoding.
pub trait ImageLoader: Send + Sync {
    fn load_image(&self, path: &str, max: Dimensions) -> Result<RawImageData>;
}

/// Rasterize a line of text into RGBA pixels. Alpha carries glyph coverage.
pub trait TextRenderer: Send + Sync {
    fn render_text(
        &self,
        text: &str,
        font_size_px: u32,
        font_family: &str,
        color: Color,
    ) -> Result<TextRenderResult>;
}

// ── Scaling ─────────────────────────────────────────────────────────

/// Fit `original` inside `max` without changing its aspect ratio.
///
/// The larger axis is clamped first and the other derived from the aspect
/// ratio; if that overflows its own limit it is clamped instead and the
/// first axis recomputed. Images are never enlarged. One axis may end up
/// smaller than its limit.
pub fn scaled_dimensions(original: Dimensions, max: Dimensions) -> Dimensions {
    if original.width == 0 || original.height == 0 {
        return Dimensions::new(original.width.min(max.width), original.height.min(max.height));
    }

    let aspect = original.width as f64 / original.height as f64;
    let round = |v: f64| v.round().max(1.0) as u32;

    let (width, height) = if original.width > original.height {
        let mut width = original.width.min(max.width);
        let mut height = round(width as f64 / aspect);
        if height > max.height {
            height = max.height;
            width = round(height as f64 * aspect);
        }
        (width, height)
    } else {
        let mut height = original.height.min(max.height);
        let mut width = round(height as f64 * aspect);
        if width > max.width {
            width = max.width;
            height = round(width as f64 / aspect);
        }
        (width, height)
    };

    Dimensions::new(width.min(max.width), height.min(max.height))
}

/// Shared tail of every image loader: scale, then flatten to RGBA.
pub(crate) fn scale_to_rgba(image: DynamicImage, max: Dimensions) -> RawImageData {
    let target = scaled_dimensions(Dimensions::new(image.width(), image.height()), max);
    let scaled = if target.width == image.width() && target.height == image.height() {
        image.to_rgba8()
    } else {
        image
            .resize_exact(target.width, target.height, FilterType::Lanczos3)
            .to_rgba8()
    };
    let (width, height) = scaled.dimensions();
    RawImageData {
        data: scaled.into_raw(),
        width,
        height,
    }
}

// ── Platform context ────────────────────────────────────────────────

/// The configured pair of ports, passed explicitly to asset-backed imagers.
///
/// Cloning is cheap (two `Arc`s); the providers themselves are never
/// replaced once built.
#[derive(Clone)]
pub struct Platform {
    image_loader: Arc<dyn ImageLoader>,
    text_renderer: Arc<dyn TextRenderer>,
}

impl Platform {
    pub fn new(
        image_loader: impl ImageLoader + 'static,
        text_renderer: impl TextRenderer + 'static,
    ) -> Self {
        Self {
            image_loader: Arc::new(image_loader),
            text_renderer: Arc::new(text_renderer),
        }
    }

    pub fn builder() -> PlatformBuilder {
        PlatformBuilder::default()
    }

    pub fn image_loader(&self) -> Arc<dyn ImageLoader> {
        Arc::clone(&self.image_loader)
    }

    pub fn text_renderer(&self) -> &dyn TextRenderer {
        self.text_renderer.as_ref()
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}

/// Collects the ports at bootstrap. [`build`](PlatformBuilder::build)
/// refuses to produce a half-configured platform.
#[derive(Default)]
pub struct PlatformBuilder {
    image_loader: Option<Arc<dyn ImageLoader>>,
    text_renderer: Option<Arc<dyn TextRenderer>>,
}

impl PlatformBuilder {
    pub fn image_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.image_loader = Some(Arc::new(loader));
        self
    }

    pub fn text_renderer(mut self, renderer: impl TextRenderer + 'static) -> Self {
        self.text_renderer = Some(Arc::new(renderer));
        self
    }

    pub fn build(self) -> Result<Platform> {
        let image_loader = self
            .image_loader
            .ok_or(ImagerError::ConfigurationMissing("image loader"))?;
        let text_renderer = self
            .text_renderer
            .ok_or(ImagerError::ConfigurationMissing("text renderer"))?;
        Ok(Platform {
            image_loader,
            text_renderer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case((200, 100), (64, 64), (64, 32))]
    #[case((100, 200), (64, 64), (32, 64))]
    #[case((100, 100), (45, 45), (45, 45))]
    #[case((30, 20), (64, 64), (30, 20))]
    #[case((1000, 10), (64, 64), (64, 1))]
    #[case((300, 200), (64, 32), (48, 32))]
    #[case((200, 300), (32, 64), (32, 48))]
    fn scaling_fits_inside_max(
        #[case] original: (u32, u32),
        #[case] max: (u32, u32),
        #[case] expected: (u32, u32),
    ) {
        let scaled = scaled_dimensions(
            Dimensions::new(original.0, original.1),
            Dimensions::new(max.0, max.1),
        );
        assert_eq!(scaled, Dimensions::new(expected.0, expected.1));
    }

    #[test]
    fn scaling_preserves_aspect_within_one_pixel() {
        let max = Dimensions::new(64, 48);
        for (w, h) in [(640, 480), (123, 457), (999, 1000), (17, 3), (5, 90)] {
            let s = scaled_dimensions(Dimensions::new(w, h), max);
            assert!(s.width <= max.width && s.height <= max.height, "{w}x{h} -> {s:?}");
            let expected_h = s.width as f64 * h as f64 / w as f64;
            let expected_w = s.height as f64 * w as f64 / h as f64;
            assert!(
                (expected_h - s.height as f64).abs() <= 1.0 || (expected_w - s.width as f64).abs() <= 1.0,
                "{w}x{h} -> {s:?}"
            );
        }
    }

    #[test]
    fn raw_pixel_lookup_is_bounds_checked() {
        let mut buf = RawImageData::blank(2, 2);
        buf.put(1, 1, [1, 2, 3, 4]);
        assert_eq!(buf.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel(2, 0), None);
    }

    #[test]
    fn builder_requires_both_ports() {
        let err = Platform::builder()
            .text_renderer(MonoTextRenderer::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ImagerError::ConfigurationMissing("image loader")));

        let err = Platform::builder()
            .image_loader(MemoryImageLoader::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ImagerError::ConfigurationMissing("text renderer")));

        assert!(
            Platform::builder()
                .image_loader(MemoryImageLoader::new())
                .text_renderer(MonoTextRenderer::new())
                .build()
                .is_ok()
        );
    }
}
