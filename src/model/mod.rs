//! Table model types.
//!
//! This module defines the grid that flows through reconstruction and is
//! handed to spreadsheet writers. Rows carry the rule that produced them;
//! cells carry their raw text and inferred typed value.

mod cell;
mod table;

pub use cell::{Cell, CellFormat, CellValue};
pub use table::{cell_reference, column_name, MergeRegion, Row, RowKind, Table};
