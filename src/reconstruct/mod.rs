//! Table reconstruction from flat extracted text.
//!
//! The pipeline runs in strict order, each stage consuming the whole output
//! of the previous one:
//!
//! 1. [`LineClassifier`] assigns each line a structural role
//! 2. [`RowBuilder`] turns classified lines into rows
//! 3. [`normalize_columns`] pads rows to a common width
//! 4. [`TypeInferencer`] promotes cell text to typed values
//! 5. [`estimate_column_widths`] derives display widths
//!
//! Reconstruction is total: every input string, including the empty one,
//! yields a valid table.

mod builder;
mod classifier;
mod infer;
mod normalize;
mod options;
mod stats;
mod width;

pub use builder::RowBuilder;
pub use classifier::{is_blank, split_tabs, LineClass, LineClassifier};
pub use infer::TypeInferencer;
pub use normalize::{max_columns, normalize_columns};
pub use options::{ReconstructOptions, WidthOptions};
pub use stats::ReconstructStats;
pub use width::estimate_column_widths;

use crate::model::Table;

/// Reconstructs typed tables from extracted text.
#[derive(Debug, Clone)]
pub struct TableReconstructor {
    options: ReconstructOptions,
    builder: RowBuilder,
    inferencer: TypeInferencer,
}

impl TableReconstructor {
    /// Create a reconstructor with default options.
    pub fn new() -> Self {
        Self::with_options(ReconstructOptions::default())
    }

    /// Create a reconstructor with custom options.
    pub fn with_options(options: ReconstructOptions) -> Self {
        Self {
            builder: RowBuilder::with_classifier(LineClassifier::with_options(&options)),
            inferencer: TypeInferencer::with_options(&options),
            options,
        }
    }

    /// Get the options.
    pub fn options(&self) -> &ReconstructOptions {
        &self.options
    }

    /// Reconstruct a table from newline-delimited text.
    pub fn reconstruct(&self, text: &str) -> Table {
        let rows = normalize_columns(self.builder.build(text));
        let rows = if self.options.infer_types {
            self.inferencer.apply(rows)
        } else {
            rows
        };
        Table::from_rows(rows)
    }

    /// Reconstruct a table and collect statistics about it.
    pub fn reconstruct_with_stats(&self, text: &str) -> (Table, ReconstructStats) {
        let table = self.reconstruct(text);
        let stats = ReconstructStats::collect(text, &table);
        log::debug!(
            "TableReconstructor: {} rows x {} columns, {} typed cells",
            stats.row_count(),
            stats.column_count,
            stats.typed_cells()
        );
        (table, stats)
    }
}

impl Default for TableReconstructor {
    fn default() -> Self {
        Self::new()
    }
}
