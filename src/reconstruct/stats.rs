//! Reconstruction statistics.

use serde::{Deserialize, Serialize};

use crate::model::{CellFormat, RowKind, Table};

/// Statistics collected while reconstructing a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructStats {
    /// Lines in the input text
    pub line_count: u32,

    /// Blank lines skipped
    pub blank_line_count: u32,

    /// Rows emitted as headings
    pub heading_rows: u32,

    /// Rows split on tabs
    pub tab_rows: u32,

    /// Rows split on whitespace runs
    pub space_rows: u32,

    /// Rows matched by the item pattern
    pub pattern_rows: u32,

    /// Rows kept as one cell
    pub fallback_rows: u32,

    /// Columns after normalization
    pub column_count: u32,

    /// Cells typed as currency
    pub currency_cells: u32,

    /// Cells typed as plain decimals
    pub decimal_cells: u32,

    /// Cells typed as integers
    pub integer_cells: u32,

    /// Cells typed as dates
    pub date_cells: u32,

    /// Non-empty cells left as text
    pub text_cells: u32,
}

impl ReconstructStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for a table built from `text`.
    pub fn collect(text: &str, table: &Table) -> Self {
        let mut stats = Self::new();
        for line in text.lines() {
            stats.line_count += 1;
            if line.trim().is_empty() {
                stats.blank_line_count += 1;
            }
        }
        stats.column_count = table.column_count() as u32;

        for row in &table.rows {
            stats.add_row(row.kind);
            for cell in &row.cells {
                if !cell.is_empty() {
                    stats.add_cell(cell.format());
                }
            }
        }
        stats
    }

    /// Count one row of the given kind.
    pub fn add_row(&mut self, kind: RowKind) {
        match kind {
            RowKind::Heading => self.heading_rows += 1,
            RowKind::TabDelimited => self.tab_rows += 1,
            RowKind::SpaceDelimited => self.space_rows += 1,
            RowKind::Pattern => self.pattern_rows += 1,
            RowKind::Fallback => self.fallback_rows += 1,
        }
    }

    /// Count one non-empty cell of the given format.
    pub fn add_cell(&mut self, format: CellFormat) {
        match format {
            CellFormat::Text => self.text_cells += 1,
            CellFormat::General => self.integer_cells += 1,
            CellFormat::Decimal => self.decimal_cells += 1,
            CellFormat::Currency(_) => self.currency_cells += 1,
            CellFormat::Date => self.date_cells += 1,
        }
    }

    /// Total rows emitted.
    pub fn row_count(&self) -> u32 {
        self.heading_rows + self.tab_rows + self.space_rows + self.pattern_rows + self.fallback_rows
    }

    /// Total cells promoted from text.
    pub fn typed_cells(&self) -> u32 {
        self.currency_cells + self.decimal_cells + self.integer_cells + self.date_cells
    }
}
