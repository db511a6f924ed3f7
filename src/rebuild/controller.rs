use std::sync::Arc;

use flume::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::LayoutEvent;
use crate::config::GalleryConfig;
use crate::error::ConfigError;
use crate::layout::{JustifiedLayout, RandomCoin};
use crate::resolver::AspectRatioResolver;

/// Width tolerance around the last built width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthBand {
    pub lower: f64,
    pub upper: f64,
}

impl WidthBand {
    pub fn around(width: f64, sensitivity: f64) -> Self {
        Self {
            lower: width - sensitivity,
            upper: width + sensitivity,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, width: f64) -> bool {
        width >= self.lower && width <= self.upper
    }
}

/// Owns the mutable state around the layout: the item set, the last
/// container width and the build generation.
///
/// Each rebuild aborts the build still in flight and tags everything it
/// emits with a fresh generation, so consumers can drop late output.
pub struct RebuildController<R: AspectRatioResolver> {
    layout: JustifiedLayout,
    resolver: Arc<R>,
    items: Arc<Vec<R::Item>>,
    container_width: Option<f64>,
    band: Option<WidthBand>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    events: Sender<LayoutEvent>,
}

impl<R> RebuildController<R>
where
    R: AspectRatioResolver + Send + Sync + 'static,
    R::Item: Send + Sync + 'static,
{
    /// Creates a controller and the receiving end of its event stream.
    pub fn new(
        config: GalleryConfig,
        resolver: R,
        items: Vec<R::Item>,
    ) -> (Self, Receiver<LayoutEvent>) {
        let (events, rx) = flume::unbounded();
        let controller = Self {
            layout: JustifiedLayout::new(config),
            resolver: Arc::new(resolver),
            items: Arc::new(items),
            container_width: None,
            band: None,
            generation: 0,
            in_flight: None,
            events,
        };
        (controller, rx)
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.layout.config
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Generation of the most recent build; 0 before the first one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Width of the most recent build.
    pub fn container_width(&self) -> Option<f64> {
        self.container_width
    }

    pub fn band(&self) -> Option<WidthBand> {
        self.band
    }

    pub fn is_building(&self) -> bool {
        self.in_flight
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Initial build for the mounted container width.
    ///
    /// # Panics
    /// Like [`rebuild`](Self::rebuild), must be called inside a tokio runtime.
    pub fn mount(&mut self, container_width: f64) -> Result<u64, ConfigError> {
        self.rebuild(container_width)
    }

    /// Rebuilds only when the width left the hysteresis band.
    ///
    /// # Panics
    /// Outside a tokio runtime when a rebuild is due.
    pub fn on_resize(&mut self, container_width: f64) -> Result<Option<u64>, ConfigError> {
        if let Some(band) = self.band {
            if band.contains(container_width) {
                debug!(container_width, ?band, "Resize within band, keeping layout");
                return Ok(None);
            }
        }
        self.rebuild(container_width).map(Some)
    }

    /// Starts a new build, superseding any build still running.
    ///
    /// # Panics
    /// The build runs on a task spawned with `tokio::spawn`, so this panics
    /// when called outside a tokio runtime. Invalid widths are rejected
    /// before spawning.
    pub fn rebuild(&mut self, container_width: f64) -> Result<u64, ConfigError> {
        // Reject bad parameters before touching the running build.
        self.layout.config.params(container_width)?;

        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!(generation = self.generation, "Aborting superseded build");
                handle.abort();
            }
        }

        self.generation += 1;
        let generation = self.generation;
        self.container_width = Some(container_width);
        self.band = Some(WidthBand::around(
            container_width,
            self.layout.config.rebuild_sensitivity,
        ));

        info!(generation, container_width, items = self.items.len(), "Rebuilding layout");

        let layout = self.layout.clone();
        let resolver = Arc::clone(&self.resolver);
        let items = Arc::clone(&self.items);
        let tx = self.events.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let _ = tx.send(LayoutEvent::Started {
                generation,
                container_width,
                item_count: items.len(),
            });

            let coin = match layout.config.seed {
                Some(seed) => RandomCoin::seeded(seed.wrapping_add(generation)),
                None => RandomCoin::from_entropy(),
            };

            let mut rows = 0u32;
            let result = layout
                .build_streaming(items.as_slice(), resolver.as_ref(), container_width, coin, |row| {
                    rows += 1;
                    let _ = tx.send(LayoutEvent::Row { generation, row });
                })
                .await;

            match result {
                Ok(skipped) => {
                    for item in skipped {
                        let _ = tx.send(LayoutEvent::Skipped { generation, item });
                    }
                    let _ = tx.send(LayoutEvent::Finished { generation, rows });
                }
                Err(error) => {
                    let _ = tx.send(LayoutEvent::Failed { generation, error });
                }
            }
        }));

        Ok(generation)
    }

    /// Waits for the current build to finish or be aborted.
    pub async fn wait(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if let Err(e) = handle.await {
                debug!(generation = self.generation, "Build ended early: {}", e);
            }
        }
    }
}

impl<R: AspectRatioResolver> Drop for RebuildController<R> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
