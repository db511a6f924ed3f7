//! Rebuild orchestration for a mounted gallery.
//!
//! - `RebuildController` - hysteresis, generations, superseding builds
//! - `GalleryView` - applies streamed rows of the newest generation
//! - `LayoutEvent` - what a build emits over its flume channel

pub mod controller;
pub mod view;

pub use controller::{RebuildController, WidthBand};
pub use view::GalleryView;

use crate::error::BuildError;
use crate::models::{SizedRow, SkippedItem};

/// Output of a running build, tagged with its generation.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    Started {
        generation: u64,
        container_width: f64,
        item_count: usize,
    },
    Row {
        generation: u64,
        row: SizedRow,
    },
    Skipped {
        generation: u64,
        item: SkippedItem,
    },
    Finished {
        generation: u64,
        rows: u32,
    },
    Failed {
        generation: u64,
        error: BuildError,
    },
}

impl LayoutEvent {
    pub fn generation(&self) -> u64 {
        match self {
            LayoutEvent::Started { generation, .. }
            | LayoutEvent::Row { generation, .. }
            | LayoutEvent::Skipped { generation, .. }
            | LayoutEvent::Finished { generation, .. }
            | LayoutEvent::Failed { generation, .. } => *generation,
        }
    }
}
