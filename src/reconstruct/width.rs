//! Column width estimation.

use crate::model::Row;

use super::normalize::max_columns;
use super::options::WidthOptions;

/// Estimate one display width per column.
///
/// The longest value in each column is floored at `min_width`, padded, and
/// capped at `max_width`. Rows shorter than the widest row count as empty
/// in the missing columns.
pub fn estimate_column_widths(rows: &[Row], options: &WidthOptions) -> Vec<usize> {
    (0..max_columns(rows))
        .map(|col| {
            let longest = rows
                .iter()
                .filter_map(|r| r.cells.get(col))
                .map(|c| c.display_len())
                .max()
                .unwrap_or(0);
            (longest.max(options.min_width) + options.padding).min(options.max_width)
        })
        .collect()
}
