//! Background image loading with best-effort, non-blocking pixel lookups.
//!
//! The converter starts its load the moment it is created. Until the load
//! settles every lookup answers "unavailable", so imagers built on top of
//! it can render a placeholder instead of waiting.
//!
//! ## Rust concepts
//! - `OnceLock` for a value written exactly once by another thread
//! - `tokio::sync::watch` to let async code await that write
//! - Moving an `Arc` clone into a spawned thread

use crate::color::Color;
use crate::geometry::Dimensions;
use crate::platform::{ImageLoader, RawImageData};
use std::sync::{Arc, OnceLock};
use std::thread;
use tokio::sync::watch;

/// Wraps one in-flight image load.
///
/// There is no cancellation and no retry: dropping the converter simply
/// discards the eventual result, and a failed load stays failed.
pub struct ImageToMatrixConverter {
    path: String,
    /// `Some(data)` once loaded, `None` once failed, unset while pending.
    slot: Arc<OnceLock<Option<RawImageData>>>,
    settled: watch::Receiver<bool>,
}

impl ImageToMatrixConverter {
    pub fn new(loader: Arc<dyn ImageLoader>, path: impl Into<String>, max: Dimensions) -> Self {
        let path = path.into();
        let slot = Arc::new(OnceLock::new());
        let (tx, settled) = watch::channel(false);

        let worker_slot = Arc::clone(&slot);
        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("image-loader".to_string())
            .spawn(move || {
                let result = match loader.load_image(&worker_path, max) {
                    Ok(data) => {
                        tracing::debug!(
                            "Loaded image {} ({}x{})",
                            worker_path,
                            data.width,
                            data.height
                        );
                        Some(data)
                    }
                    Err(e) => {
                        tracing::error!("Failed to load image {}: {}", worker_path, e);
                        None
                    }
                };
                let _ = worker_slot.set(result);
                tx.send_replace(true);
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to start loader thread for {}: {}", path, e);
            let _ = slot.set(None);
        }

        Self {
            path,
            slot,
            settled,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn data(&self) -> Option<&RawImageData> {
        self.slot.get().and_then(Option::as_ref)
    }

    /// True once the image decoded successfully.
    pub fn is_loaded(&self) -> bool {
        self.data().is_some()
    }

    /// True once the load gave up. Failures are permanent.
    pub fn failed(&self) -> bool {
        matches!(self.slot.get(), Some(None))
    }

    /// Wait until the load settles. Returns whether it succeeded.
    pub async fn wait_for_load(&self) -> bool {
        if self.slot.get().is_none() {
            let mut settled = self.settled.clone();
            // An error here means the loader thread died without reporting.
            let _ = settled.wait_for(|done| *done).await;
        }
        self.is_loaded()
    }

    /// Source color at `(x, y)` of the scaled image, or `None` when the
    /// image is not loaded, failed, or the point is outside it.
    pub fn pixel_color(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 {
            return None;
        }
        let [r, g, b, _] = self.data()?.pixel(x as u32, y as u32)?;
        Some(Color::new(r, g, b))
    }

    /// Final size of the scaled image, once known.
    pub fn scaled_dimensions(&self) -> Option<Dimensions> {
        self.data().map(RawImageData::dimensions)
    }
}
