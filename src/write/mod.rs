//! Spreadsheet writers.
//!
//! A writer turns a reconstructed [`Table`] and its column widths into the
//! bytes of one output file.

mod json;
mod xlsx;

pub use json::{JsonFormat, JsonWriter};
pub use xlsx::{sanitize_sheet_name, XlsxWriter, DEFAULT_SHEET_NAME};

use crate::error::Result;
use crate::model::Table;

/// Trait for spreadsheet writers.
pub trait SpreadsheetWriter: Send + Sync {
    /// Get the name of this writer.
    fn name(&self) -> &str;

    /// File extension of the output, without the leading dot.
    fn extension(&self) -> &str;

    /// MIME type of the output.
    fn mime_type(&self) -> &str;

    /// Serialize a table. `widths` holds one character width per column.
    fn write(&self, table: &Table, widths: &[usize]) -> Result<Vec<u8>>;
}
