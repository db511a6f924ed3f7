use std::path::{Path, PathBuf};

use image::ImageReader;
use tokio::task;
use tracing::{trace, warn};

use super::cache::{CacheKey, RatioCache};
use super::{ratio_from_dimensions, AspectRatioResolver};
use crate::error::ResolutionError;
use crate::models::MediaItem;

/// Resolves ratios by reading image headers off disk.
///
/// Header reads run on the blocking pool; results are memoized so a
/// rebuild never touches the disk for an unchanged file.
#[derive(Clone, Default)]
pub struct ImageHeaderResolver {
    cache: RatioCache,
}

impl ImageHeaderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: RatioCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &RatioCache {
        &self.cache
    }
}

impl AspectRatioResolver for ImageHeaderResolver {
    type Item = MediaItem;

    async fn resolve(&self, item: &MediaItem) -> Result<f64, ResolutionError> {
        let key = CacheKey::new(&item.path, item.mtime, item.size);
        if let Some(ratio) = self.cache.get(&key) {
            trace!(path = ?item.path, ratio, "Ratio cache hit");
            return Ok(ratio);
        }

        let path = item.path.clone();
        let (width, height) = task::spawn_blocking(move || read_dimensions(&path))
            .await
            .map_err(|e| ResolutionError::TaskFailed(e.to_string()))??;

        let ratio = ratio_from_dimensions(width, height)?;
        trace!(path = ?item.path, width, height, ratio, "Probed image header");
        self.cache.insert(key, ratio);
        Ok(ratio)
    }
}

/// Reads image dimensions without decoding pixel data.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32), ResolutionError> {
    let unreadable = |reason: String| ResolutionError::Unreadable {
        path: PathBuf::from(path),
        reason,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| unreadable(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?;
    reader.into_dimensions().map_err(|e| {
        warn!("Failed to read image dimensions for {:?}: {}", path, e);
        unreadable(e.to_string())
    })
}
