//! Aspect-ratio resolution for gallery items.
//!
//! - `PlainRatios` - items are their own ratios
//! - `KnownDimensions` - ratios from pixel sizes already on the item
//! - `ImageHeaderResolver` - probes image headers, memoized in a `RatioCache`

pub mod cache;
pub mod image_header;

use std::future::Future;

use crate::error::ResolutionError;
use crate::models::MediaItem;

pub use cache::RatioCache;
pub use image_header::ImageHeaderResolver;

/// Looks up the width/height ratio of an item.
///
/// Resolving the same item twice must yield the same value.
pub trait AspectRatioResolver {
    type Item;

    fn resolve(
        &self,
        item: &Self::Item,
    ) -> impl Future<Output = Result<f64, ResolutionError>> + Send;
}

/// Accepts a ratio only if it is positive and finite.
pub fn checked_ratio(ratio: f64) -> Result<f64, ResolutionError> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(ResolutionError::InvalidRatio(ratio))
    }
}

/// Ratio from pixel dimensions.
pub fn ratio_from_dimensions(width: u32, height: u32) -> Result<f64, ResolutionError> {
    if width == 0 || height == 0 {
        return Err(ResolutionError::Degenerate { width, height });
    }
    checked_ratio(width as f64 / height as f64)
}

/// Items that already are aspect ratios.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRatios;

impl AspectRatioResolver for PlainRatios {
    type Item = f64;

    async fn resolve(&self, item: &f64) -> Result<f64, ResolutionError> {
        checked_ratio(*item)
    }
}

/// Uses the `width`/`height` recorded on a [`MediaItem`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownDimensions;

impl AspectRatioResolver for KnownDimensions {
    type Item = MediaItem;

    async fn resolve(&self, item: &MediaItem) -> Result<f64, ResolutionError> {
        ratio_from_dimensions(item.width, item.height)
    }
}
