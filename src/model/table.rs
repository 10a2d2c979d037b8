//! Table types.

use super::Cell;
use serde::{Deserialize, Serialize};

/// A reconstructed table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<Row>,

    /// Regions rendered as one joined cell
    pub merges: Vec<MergeRegion>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows, without merges.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            merges: Vec::new(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Add a merge region.
    pub fn add_merge(&mut self, region: MergeRegion) {
        self.merges.push(region);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if every row has the same length.
    pub fn is_rectangular(&self) -> bool {
        let width = self.column_count();
        self.rows.iter().all(|r| r.len() == width)
    }

    /// Get the cell at a position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Iterate over the cells of one column, skipping rows that are too short.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |r| r.cells.get(col))
    }

    /// Split into rows and merge regions.
    pub fn into_parts(self) -> (Vec<Row>, Vec<MergeRegion>) {
        (self.rows, self.merges)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Which classifier rule produced a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Section title stored as a single cell
    Heading,
    /// Split on tab characters
    TabDelimited,
    /// Split on runs of two or more whitespace characters
    SpaceDelimited,
    /// Code/label/unit/quantity/price/total line
    Pattern,
    /// Unrecognized line stored as a single cell
    #[default]
    Fallback,
}

impl RowKind {
    /// Short name for display.
    pub fn name(&self) -> &'static str {
        match self {
            RowKind::Heading => "heading",
            RowKind::TabDelimited => "tab",
            RowKind::SpaceDelimited => "space",
            RowKind::Pattern => "pattern",
            RowKind::Fallback => "fallback",
        }
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in the row
    pub cells: Vec<Cell>,

    /// Rule that produced the row
    pub kind: RowKind,
}

impl Row {
    /// Create a new row with cells.
    pub fn new(cells: Vec<Cell>, kind: RowKind) -> Self {
        Self { cells, kind }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>, kind: RowKind) -> Self {
        Self::new(values.into_iter().map(Cell::text).collect(), kind)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.raw())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A rectangular span of the grid, zero-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRegion {
    /// Top row
    pub first_row: usize,
    /// Left column
    pub first_col: usize,
    /// Bottom row
    pub last_row: usize,
    /// Right column
    pub last_col: usize,
}

impl MergeRegion {
    /// Create a region; corners are reordered so first <= last.
    pub fn new(first_row: usize, first_col: usize, last_row: usize, last_col: usize) -> Self {
        Self {
            first_row: first_row.min(last_row),
            first_col: first_col.min(last_col),
            last_row: first_row.max(last_row),
            last_col: first_col.max(last_col),
        }
    }

    /// A region spanning `cols` columns of one row.
    pub fn row_span(row: usize, first_col: usize, cols: usize) -> Self {
        Self::new(row, first_col, row, first_col + cols.saturating_sub(1))
    }

    /// A1-style range, e.g. `A1:F1`.
    pub fn a1_range(&self) -> String {
        format!(
            "{}:{}",
            cell_reference(self.first_row, self.first_col),
            cell_reference(self.last_row, self.last_col)
        )
    }
}

/// Spreadsheet column name for a zero-based index (`0` → `A`, `26` → `AA`).
pub fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// A1-style reference for a zero-based position.
pub fn cell_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_name(col), row + 1)
}
