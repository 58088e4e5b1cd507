//! Filesystem image loader backed by the `image` crate.

use super::{ImageLoader, RawImageData, scale_to_rgba};
use crate::error::{ImagerError, Result};
use crate::geometry::Dimensions;
use image::ImageReader;
use std::path::{Path, PathBuf};

/// Loads images from an assets directory.
///
/// Relative paths are tried against the assets directory first and then
/// against each fallback directory in order; the first one that decodes
/// wins. Absolute paths are used as-is.
#[derive(Clone, Debug)]
pub struct FileImageLoader {
    assets_dir: PathBuf,
    fallback_dirs: Vec<PathBuf>,
}

impl FileImageLoader {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            fallback_dirs: Vec::new(),
        }
    }

    pub fn with_fallback(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dirs.push(dir.into());
        self
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Every location a relative `path` may resolve to, in lookup order.
    pub fn candidate_paths(&self, path: &str) -> Vec<PathBuf> {
        let requested = Path::new(path);
        if requested.is_absolute() {
            return vec![requested.to_path_buf()];
        }
        std::iter::once(&self.assets_dir)
            .chain(&self.fallback_dirs)
            .map(|dir| dir.join(requested))
            .collect()
    }
}

fn decode(path: &Path, max: Dimensions) -> Result<RawImageData> {
    let img = ImageReader::open(path)?.decode()?;
    Ok(scale_to_rgba(img, max))
}

impl ImageLoader for FileImageLoader {
    fn load_image(&self, path: &str, max: Dimensions) -> Result<RawImageData> {
        let candidates = self.candidate_paths(path);
        let mut failures = Vec::new();

        for (attempt, candidate) in candidates.iter().enumerate() {
            match decode(candidate, max) {
                Ok(data) => {
                    if attempt > 0 {
                        tracing::info!(
                            "Loaded image {} from fallback path {}",
                            path,
                            candidate.display()
                        );
                    }
                    return Ok(data);
                }
                Err(e) => failures.push(format!("{} ({})", candidate.display(), e)),
            }
        }

        Err(ImagerError::image_load(
            path,
            format!("tried paths: {}", failures.join(", ")),
        ))
    }
}
