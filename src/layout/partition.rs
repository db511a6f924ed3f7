use tracing::{debug, trace, warn};

use super::coin::CoinFlip;
use crate::config::{LayoutParams, ResolutionPolicy};
use crate::error::BuildError;
use crate::models::{FinishedRow, Member, Row, RowClose, SkippedItem};
use crate::resolver::{checked_ratio, AspectRatioResolver};

/// Streaming row breaker.
///
/// Items are pushed one at a time in input order; a row is handed back
/// as soon as it closes. The open row is flushed by [`Partitioner::finish`].
#[derive(Debug)]
pub struct Partitioner<C> {
    max_aspect_ratio: f64,
    min_aspect_ratio: f64,
    full_width_cadence: i32,
    /// Rows left until the next full-width row; never reaches 0 when the
    /// cadence is disabled.
    wait_for_full_width_row: i32,
    justify_last_row: bool,
    open: Row,
    coin: C,
}

impl<C: CoinFlip> Partitioner<C> {
    pub fn new(params: &LayoutParams, coin: C) -> Self {
        let cadence = params.full_width_cadence();
        Self {
            max_aspect_ratio: params.max_aspect_ratio(),
            min_aspect_ratio: params.min_aspect_ratio(),
            full_width_cadence: cadence,
            wait_for_full_width_row: cadence.saturating_sub(1),
            justify_last_row: params.justify_last_row(),
            open: Row::new(),
            coin,
        }
    }

    /// Adds the next item. Returns the row it closed, if any.
    ///
    /// While the open row holds a single item neither close test runs, so
    /// the coin is not flipped for it even when its ratio is inside the
    /// height band. Only the full-width rule closes a one-item row.
    pub fn push(&mut self, member: Member) -> Option<FinishedRow> {
        self.open.push(member);

        // A lone landscape item becomes its own full-width row when the
        // cadence comes due. Only checked on a row's first item.
        if self.wait_for_full_width_row == 0
            && self.open.len() == 1
            && self.open.aspect_ratio() > 1.0
        {
            self.wait_for_full_width_row = self.full_width_cadence.saturating_sub(1);
            return Some(self.close(RowClose::FullWidth));
        }

        // Outside the full-width rule a row always takes at least two
        // items, however wide the first one is.
        if self.open.len() < 2 {
            return None;
        }

        let ratio = self.open.aspect_ratio();
        let close = if ratio >= self.max_aspect_ratio {
            Some(RowClose::Filled)
        } else if ratio >= self.min_aspect_ratio && self.coin.flip() {
            Some(RowClose::Early)
        } else {
            None
        };

        close.map(|reason| {
            if self.wait_for_full_width_row > 0 {
                self.wait_for_full_width_row -= 1;
            }
            self.close(reason)
        })
    }

    /// Flushes the trailing row. Empty rows are dropped.
    pub fn finish(self) -> Option<FinishedRow> {
        if self.open.is_empty() {
            return None;
        }
        Some(FinishedRow {
            row: self.open,
            justify: self.justify_last_row,
            close: RowClose::Trailing,
        })
    }

    fn close(&mut self, close: RowClose) -> FinishedRow {
        let row = std::mem::take(&mut self.open);
        trace!(
            items = row.len(),
            aspect_ratio = row.aspect_ratio(),
            ?close,
            "Closed row"
        );
        FinishedRow {
            row,
            justify: true,
            close,
        }
    }
}

/// Resolves every item once, in order, and feeds the partitioner.
///
/// Each closed row goes to `on_row` before the next item is resolved.
/// Items whose ratio cannot be resolved are handled per `policy`; skipped
/// ones are returned. An invalid substitute ratio is rejected before any
/// item is resolved.
pub async fn drive<R, C, F>(
    items: &[R::Item],
    resolver: &R,
    params: &LayoutParams,
    coin: C,
    policy: ResolutionPolicy,
    mut on_row: F,
) -> Result<Vec<SkippedItem>, BuildError>
where
    R: AspectRatioResolver,
    C: CoinFlip,
    F: FnMut(FinishedRow),
{
    policy.validate()?;
    debug!(
        items = items.len(),
        container_width = params.container_width(),
        max_aspect_ratio = params.max_aspect_ratio(),
        min_aspect_ratio = params.min_aspect_ratio(),
        "Partitioning items"
    );

    let mut partitioner = Partitioner::new(params, coin);
    let mut skipped = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let aspect_ratio = match resolver.resolve(item).await.and_then(checked_ratio) {
            Ok(ratio) => ratio,
            Err(error) => match policy {
                ResolutionPolicy::Substitute(ratio) => {
                    warn!(index, %error, substitute = ratio, "Substituting aspect ratio");
                    ratio
                }
                ResolutionPolicy::Skip => {
                    warn!(index, %error, "Skipping item with unresolved aspect ratio");
                    skipped.push(SkippedItem { index, error });
                    continue;
                }
                ResolutionPolicy::Fail => {
                    return Err(BuildError::Resolution {
                        index,
                        source: error,
                    });
                }
            },
        };

        if let Some(row) = partitioner.push(Member {
            index,
            aspect_ratio,
        }) {
            on_row(row);
        }
    }

    if let Some(row) = partitioner.finish() {
        on_row(row);
    }

    Ok(skipped)
}

/// Collects the closed rows of a single pass.
pub async fn partition<R, C>(
    items: &[R::Item],
    resolver: &R,
    params: &LayoutParams,
    coin: C,
    policy: ResolutionPolicy,
) -> Result<Vec<FinishedRow>, BuildError>
where
    R: AspectRatioResolver,
    C: CoinFlip,
{
    let mut rows = Vec::new();
    drive(items, resolver, params, coin, policy, |row| rows.push(row)).await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalleryConfig;
    use crate::error::ConfigError;
    use crate::layout::coin::{FixedCoin, RandomCoin, ScriptedCoin};
    use crate::resolver::PlainRatios;

    fn params(width: f64, target: f64, bandwidth: f64, cadence: i32) -> LayoutParams {
        GalleryConfig {
            target_row_height: target,
            row_height_bandwidth: bandwidth,
            full_width_cadence: cadence,
            ..Default::default()
        }
        .params(width)
        .unwrap()
    }

    fn indices(rows: &[FinishedRow]) -> Vec<Vec<usize>> {
        rows.iter()
            .map(|r| r.row.members().iter().map(|m| m.index).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_empty_input() {
        let p = params(900.0, 300.0, 50.0, -1);
        let rows = partition(&[], &PlainRatios, &p, FixedCoin(true), Default::default())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_boundary_closes_at_max_ratio() {
        let p = params(900.0, 300.0, 0.0, -1);
        assert_eq!(p.max_aspect_ratio(), 3.0);
        assert_eq!(p.min_aspect_ratio(), 3.0);

        let mut coin = ScriptedCoin::new([], false);
        let rows = partition(
            &[1.5, 1.5, 1.5],
            &PlainRatios,
            &p,
            &mut coin,
            Default::default(),
        )
        .await
        .unwrap();

        assert_eq!(indices(&rows), vec![vec![0, 1], vec![2]]);
        assert_eq!(rows[0].close, RowClose::Filled);
        assert!(rows[0].justify);
        assert_eq!(rows[1].close, RowClose::Trailing);
        assert!(!rows[1].justify);
        // Deterministic: min == max, so the coin is never consulted.
        assert_eq!(coin.flips(), 0);
    }

    #[tokio::test]
    async fn test_trailing_row_uses_justify_last_row() {
        let p = GalleryConfig {
            justify_last_row: true,
            ..Default::default()
        }
        .params(900.0)
        .unwrap();
        let rows = partition(&[1.0], &PlainRatios, &p, FixedCoin(false), Default::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].justify);
        assert_eq!(rows[0].close, RowClose::Trailing);
    }

    #[tokio::test]
    async fn test_coin_closes_row_inside_band() {
        // width 1000, heights 250..350: min ratio ~2.857, max ratio 4.0
        let p = params(1000.0, 300.0, 50.0, -1);
        let items = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0];

        let heads = partition(&items, &PlainRatios, &p, FixedCoin(true), Default::default())
            .await
            .unwrap();
        assert_eq!(indices(&heads), vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(heads[0].close, RowClose::Early);

        let tails = partition(&items, &PlainRatios, &p, FixedCoin(false), Default::default())
            .await
            .unwrap();
        assert_eq!(indices(&tails), vec![vec![0, 1, 2, 3], vec![4, 5]]);
        assert_eq!(tails[0].close, RowClose::Filled);
    }

    #[tokio::test]
    async fn test_coin_only_flipped_inside_band() {
        let p = params(1000.0, 300.0, 50.0, -1);
        let mut coin = ScriptedCoin::new([false], false);
        partition(
            &[1.0, 1.0, 1.0, 1.0],
            &PlainRatios,
            &p,
            &mut coin,
            Default::default(),
        )
        .await
        .unwrap();
        // Ratios 1, 2 are below the band, 3 is inside, 4 hits the max.
        assert_eq!(coin.flips(), 1);
    }

    #[tokio::test]
    async fn test_wide_single_item_waits_for_next() {
        let p = params(900.0, 300.0, 0.0, -1);
        let rows = partition(&[5.0, 0.5, 1.0], &PlainRatios, &p, FixedCoin(false), Default::default())
            .await
            .unwrap();
        assert_eq!(indices(&rows), vec![vec![0, 1], vec![2]]);

        // A lone item inside the height band is not offered to the coin either.
        let p = params(900.0, 300.0, 50.0, -1);
        let mut coin = ScriptedCoin::new([], true);
        let rows = partition(&[3.0, 1.0, 1.0], &PlainRatios, &p, &mut coin, Default::default())
            .await
            .unwrap();
        assert_eq!(indices(&rows), vec![vec![0, 1], vec![2]]);
        assert_eq!(rows[0].close, RowClose::Filled);
        assert_eq!(coin.flips(), 0);
    }

    #[tokio::test]
    async fn test_full_width_cadence() {
        let p = params(900.0, 300.0, 0.0, 3);
        let items = vec![1.5; 15];
        let rows = partition(&items, &PlainRatios, &p, FixedCoin(false), Default::default())
            .await
            .unwrap();

        let sizes: Vec<usize> = rows.iter().map(|r| r.row.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1, 2, 2, 1, 2, 2, 1]);
        let closes: Vec<RowClose> = rows.iter().map(|r| r.close).collect();
        assert_eq!(closes[2], RowClose::FullWidth);
        assert_eq!(closes[5], RowClose::FullWidth);
        assert_eq!(closes[8], RowClose::FullWidth);
        assert!(rows.iter().all(|r| r.justify));
    }

    #[tokio::test]
    async fn test_full_width_waits_for_landscape_item() {
        let p = params(900.0, 300.0, 0.0, 1);
        // Cadence 1 makes every row eligible; portrait and square items
        // must still accumulate normally.
        let rows = partition(
            &[0.8, 1.0, 1.2, 2.0, 1.5],
            &PlainRatios,
            &p,
            FixedCoin(false),
            Default::default(),
        )
        .await
        .unwrap();
        assert_eq!(indices(&rows), vec![vec![0, 1, 2], vec![3], vec![4]]);
        assert_eq!(rows[0].close, RowClose::Filled);
        assert_eq!(rows[1].close, RowClose::FullWidth);
        assert_eq!(rows[2].close, RowClose::FullWidth);
    }

    #[tokio::test]
    async fn test_cadence_disabled() {
        for cadence in [-1, 0] {
            let p = params(900.0, 300.0, 0.0, cadence);
            let rows = partition(&vec![1.5; 6], &PlainRatios, &p, FixedCoin(false), Default::default())
                .await
                .unwrap();
            assert!(rows.iter().all(|r| r.close != RowClose::FullWidth));
            assert_eq!(rows.len(), 3);
        }
    }

    #[tokio::test]
    async fn test_completeness_and_conservation() {
        let p = params(1280.0, 240.0, 60.0, 4);
        let items: Vec<f64> = (0..200).map(|i| 0.5 + (i % 7) as f64 * 0.35).collect();
        let rows = partition(&items, &PlainRatios, &p, RandomCoin::seeded(3), Default::default())
            .await
            .unwrap();

        let flattened: Vec<usize> = rows
            .iter()
            .flat_map(|r| r.row.members().iter().map(|m| m.index))
            .collect();
        assert_eq!(flattened, (0..items.len()).collect::<Vec<_>>());

        for r in &rows {
            assert!(!r.row.is_empty());
            let sum: f64 = r.row.members().iter().map(|m| items[m.index]).sum();
            assert!((r.row.aspect_ratio() - sum).abs() < 1e-9);
        }
        for r in &rows[..rows.len() - 1] {
            assert!(r.justify);
        }
    }

    #[tokio::test]
    async fn test_resolution_policies() {
        let p = params(900.0, 300.0, 0.0, -1);
        let items = [1.5, -1.0, 1.5];

        let substituted = partition(&items, &PlainRatios, &p, FixedCoin(false), ResolutionPolicy::Substitute(1.5))
            .await
            .unwrap();
        assert_eq!(indices(&substituted), vec![vec![0, 1], vec![2]]);
        assert_eq!(substituted[0].row.members()[1].aspect_ratio, 1.5);

        let mut rows = Vec::new();
        let skipped = drive(&items, &PlainRatios, &p, FixedCoin(false), ResolutionPolicy::Skip, |r| {
            rows.push(r)
        })
        .await
        .unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].index, 1);
        assert_eq!(indices(&rows), vec![vec![0, 2]]);

        let failed = partition(&items, &PlainRatios, &p, FixedCoin(false), ResolutionPolicy::Fail).await;
        assert!(matches!(
            failed,
            Err(BuildError::Resolution { index: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_substitute_rejected() {
        let p = params(900.0, 300.0, 0.0, -1);
        for ratio in [0.0, -2.0, f64::INFINITY] {
            let result = partition(
                &[-1.0],
                &PlainRatios,
                &p,
                FixedCoin(true),
                ResolutionPolicy::Substitute(ratio),
            )
            .await;
            assert_eq!(
                result,
                Err(BuildError::Config(ConfigError::SubstituteRatio(ratio)))
            );
        }
    }
}
