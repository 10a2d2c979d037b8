//! Column normalization.

use crate::model::{Cell, Row};

/// Widest row length, `0` when there are no rows.
pub fn max_columns(rows: &[Row]) -> usize {
    rows.iter().map(Row::len).max().unwrap_or(0)
}

/// Right-pad every row with empty cells to the widest row's length.
///
/// Normalizing an already rectangular sequence returns it unchanged.
pub fn normalize_columns(rows: Vec<Row>) -> Vec<Row> {
    let width = max_columns(&rows);
    rows.into_iter()
        .map(|mut row| {
            if row.cells.len() < width {
                row.cells.resize_with(width, Cell::empty);
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowKind;

    fn rows() -> Vec<Row> {
        vec![
            Row::from_strings(["INVOICE"], RowKind::Heading),
            Row::from_strings(["A1", "Widget", "pcs"], RowKind::SpaceDelimited),
            Row::from_strings(["x", "y"], RowKind::TabDelimited),
        ]
    }

    #[test]
    fn test_normalize_pads_short_rows() {
        let normalized = normalize_columns(rows());
        assert!(normalized.iter().all(|r| r.len() == 3));
        assert_eq!(normalized[0].cells[0].raw(), "INVOICE");
        assert!(normalized[0].cells[1].is_empty());
        assert!(normalized[2].cells[2].is_empty());
        assert_eq!(normalized[0].kind, RowKind::Heading);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_columns(rows());
        let twice = normalize_columns(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_columns(Vec::new()).is_empty());
        assert_eq!(max_columns(&[]), 0);
    }
}
