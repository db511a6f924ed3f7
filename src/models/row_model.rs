use crate::error::ResolutionError;
use crate::models::Placement;

/// An item placed in a row, identified by its position in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Member {
    pub index: usize,
    pub aspect_ratio: f64,
}

/// A row under construction.
///
/// `aspect_ratio` is the sum of the members' ratios; `push` is the only
/// mutator so the two never drift apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    aspect_ratio: f64,
    members: Vec<Member>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, member: Member) {
        self.aspect_ratio += member.aspect_ratio;
        self.members.push(member);
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Why a row was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClose {
    /// Single landscape item forced full-width by the cadence.
    FullWidth,
    /// Combined ratio reached the minimum row height.
    Filled,
    /// Closed early within the height band by a coin flip.
    Early,
    /// Whatever was left when the input ran out.
    Trailing,
}

/// A closed row waiting to be sized.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedRow {
    pub row: Row,
    pub justify: bool,
    pub close: RowClose,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedItem {
    pub index: usize,
    pub aspect_ratio: f64,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizedRow {
    pub row_index: u32,
    pub aspect_ratio: f64,
    pub justified: bool,
    pub close: RowClose,
    pub items: Vec<SizedItem>,
}

impl SizedRow {
    /// Input index of the first item in this row.
    pub fn start_index(&self) -> Option<usize> {
        self.items.first().map(|item| item.index)
    }
}

/// An item left out of the layout because its ratio could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedItem {
    pub index: usize,
    pub error: ResolutionError,
}

/// Represents a row break: the input index range a row covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBreak {
    /// Start index in the items array (inclusive)
    pub start_index: usize,
    /// End index in the items array (exclusive)
    pub end_index: usize,
}

/// The result of one full build.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub container_width: f64,
    /// Spacing between items, carried through for the presentation layer.
    pub gutter: f64,
    pub rows: Vec<SizedRow>,
    pub skipped: Vec<SkippedItem>,
}

impl Layout {
    /// Number of placed items.
    pub fn item_count(&self) -> usize {
        self.rows.iter().map(|r| r.items.len()).sum()
    }

    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.rows
            .iter()
            .flat_map(|r| r.items.iter())
            .find(|item| item.index == index)
            .map(|item| item.placement)
    }

    /// Row index ranges in input order. With skipped items a range can
    /// span indices that received no placement.
    pub fn row_breaks(&self) -> Vec<RowBreak> {
        self.rows
            .iter()
            .filter_map(|row| {
                let first = row.items.first()?;
                let last = row.items.last()?;
                Some(RowBreak {
                    start_index: first.index,
                    end_index: last.index + 1,
                })
            })
            .collect()
    }
}
