//! Image loader for assets bundled into the binary or fetched ahead of time.

use super::{ImageLoader, RawImageData, scale_to_rgba};
use crate::error::{ImagerError, Result};
use crate::geometry::Dimensions;
use std::collections::HashMap;
use std::sync::Arc;

/// Decodes images from an in-memory bundle of encoded files keyed by name.
///
/// Useful with `include_bytes!` or when assets arrive over the network
/// and no filesystem is available.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageLoader {
    assets: HashMap<String, Arc<[u8]>>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.assets.insert(name.into(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load_image(&self, path: &str, max: Dimensions) -> Result<RawImageData> {
        let bytes = self
            .assets
            .get(path)
            .ok_or_else(|| ImagerError::image_load(path, "not in asset bundle"))?;
        let img = image::load_from_memory(bytes)?;
        Ok(scale_to_rgba(img, max))
    }
}
