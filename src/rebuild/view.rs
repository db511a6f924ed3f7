use flume::Receiver;
use tracing::trace;

use super::LayoutEvent;
use crate::error::BuildError;
use crate::models::Placement;

/// Per-item presentation slots fed by layout events.
///
/// Only the newest generation seen is ever written; a newer generation
/// clears the slots, and events from older ones are dropped.
#[derive(Debug, Clone)]
pub struct GalleryView {
    generation: u64,
    slots: Vec<Option<Placement>>,
    rows: u32,
    skipped: Vec<usize>,
    settled: bool,
    error: Option<BuildError>,
}

impl GalleryView {
    pub fn new(item_count: usize) -> Self {
        Self {
            generation: 0,
            slots: vec![None; item_count],
            rows: 0,
            skipped: Vec::new(),
            settled: false,
            error: None,
        }
    }

    /// Applies one event. Returns false if it was stale.
    pub fn apply(&mut self, event: LayoutEvent) -> bool {
        let generation = event.generation();
        if generation < self.generation {
            trace!(generation, current = self.generation, "Dropping stale layout event");
            return false;
        }
        if generation > self.generation {
            self.reset(generation);
        }

        match event {
            LayoutEvent::Started { .. } => {}
            LayoutEvent::Row { row, .. } => {
                for item in row.items {
                    if let Some(slot) = self.slots.get_mut(item.index) {
                        *slot = Some(item.placement);
                    }
                }
                self.rows += 1;
            }
            LayoutEvent::Skipped { item, .. } => self.skipped.push(item.index),
            LayoutEvent::Finished { .. } => self.settled = true,
            LayoutEvent::Failed { error, .. } => {
                self.error = Some(error);
                self.settled = true;
            }
        }
        true
    }

    /// Applies everything currently queued on `rx`. Returns how many
    /// events were applied.
    pub fn drain(&mut self, rx: &Receiver<LayoutEvent>) -> usize {
        rx.try_iter()
            .map(|event| self.apply(event))
            .filter(|applied| *applied)
            .count()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.slots.get(index).copied().flatten()
    }

    pub fn placed_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn row_count(&self) -> u32 {
        self.rows
    }

    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    /// The newest generation has finished or failed.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn error(&self) -> Option<&BuildError> {
        self.error.as_ref()
    }

    fn reset(&mut self, generation: u64) {
        self.generation = generation;
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.rows = 0;
        self.skipped.clear();
        self.settled = false;
        self.error = None;
    }
}
