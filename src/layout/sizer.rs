use crate::config::LayoutParams;
use crate::models::{Clear, Extent, FinishedRow, Placement, SizedItem, SizedRow};

/// Computes presentation attributes for every item of a closed row.
///
/// Justified rows share the container width in proportion to each item's
/// ratio and leave the height to the presentation layer. Unjustified rows
/// keep natural proportions at the minimum row height. Returns `None` for
/// an empty row.
pub fn size_row(finished: &FinishedRow, row_index: u32, params: &LayoutParams) -> Option<SizedRow> {
    let row = &finished.row;
    if row.is_empty() {
        return None;
    }

    let min_row_height = params.min_row_height();
    let items = row
        .members()
        .iter()
        .enumerate()
        .map(|(position, member)| {
            let (width, height) = if finished.justify {
                (
                    Extent::Percent(member.aspect_ratio / row.aspect_ratio() * 100.0),
                    Extent::Auto,
                )
            } else {
                (
                    Extent::Px(min_row_height * member.aspect_ratio),
                    Extent::Px(min_row_height),
                )
            };
            SizedItem {
                index: member.index,
                aspect_ratio: member.aspect_ratio,
                placement: Placement {
                    width,
                    height,
                    clear: if position == 0 { Clear::Left } else { Clear::None },
                },
            }
        })
        .collect();

    Some(SizedRow {
        row_index,
        aspect_ratio: row.aspect_ratio(),
        justified: finished.justify,
        close: finished.close,
        items,
    })
}
