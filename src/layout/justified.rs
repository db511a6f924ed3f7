use tracing::debug;

use super::coin::CoinFlip;
use super::partition::drive;
use super::sizer::size_row;
use crate::config::GalleryConfig;
use crate::error::BuildError;
use crate::models::{Layout, SizedRow, SkippedItem};
use crate::resolver::AspectRatioResolver;

/// Justified row layout.
///
/// A pure function of (items, config, container width, coin): nothing is
/// stored between builds, so a rebuild is just another call.
///
/// # Algorithm
/// 1. Resolve each item's aspect ratio once, in input order.
/// 2. Accumulate items into a row until the combined ratio pushes the row
///    height to the minimum, or a coin flip closes it anywhere inside the
///    height band. Every Nth eligible row may instead be a single
///    landscape item stretched to full width.
/// 3. Size each closed row: justified rows split the width by ratio, the
///    trailing row keeps natural proportions unless `justify_last_row`.
#[derive(Debug, Clone, Default)]
pub struct JustifiedLayout {
    pub config: GalleryConfig,
}

impl JustifiedLayout {
    pub fn new(config: GalleryConfig) -> Self {
        Self { config }
    }

    /// Computes the whole layout.
    pub async fn build<R, C>(
        &self,
        items: &[R::Item],
        resolver: &R,
        container_width: f64,
        coin: C,
    ) -> Result<Layout, BuildError>
    where
        R: AspectRatioResolver,
        C: CoinFlip,
    {
        let mut rows = Vec::new();
        let skipped = self
            .build_streaming(items, resolver, container_width, coin, |row| rows.push(row))
            .await?;

        Ok(Layout {
            container_width,
            gutter: self.config.gutter,
            rows,
            skipped,
        })
    }

    /// Hands each sized row to `on_row` as soon as it closes, before the
    /// next item is resolved. Returns the items left out of the layout.
    pub async fn build_streaming<R, C, F>(
        &self,
        items: &[R::Item],
        resolver: &R,
        container_width: f64,
        coin: C,
        mut on_row: F,
    ) -> Result<Vec<SkippedItem>, BuildError>
    where
        R: AspectRatioResolver,
        C: CoinFlip,
        F: FnMut(SizedRow),
    {
        let params = self.config.params(container_width)?;
        let mut row_index = 0u32;

        let skipped = drive(
            items,
            resolver,
            &params,
            coin,
            self.config.resolution_policy,
            |finished| {
                if let Some(sized) = size_row(&finished, row_index, &params) {
                    row_index += 1;
                    on_row(sized);
                }
            },
        )
        .await?;

        debug!(
            rows = row_index,
            skipped = skipped.len(),
            container_width,
            "Layout built"
        );
        Ok(skipped)
    }
}
