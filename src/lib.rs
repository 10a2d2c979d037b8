//! # retab
//!
//! Heuristic table reconstruction from extracted document text.
//!
//! Text pulled out of a PDF loses its table structure: what remains is a
//! sequence of lines. This library classifies those lines, rebuilds rows and
//! columns, infers typed cell values and writes the result as a spreadsheet.
//!
//! ## Quick Start
//!
//! ```
//! use retab::{estimate_column_widths, reconstruct_table, CellFormat};
//!
//! let text = "INVOICE\nA1  Widget  pcs  3  10,00€  30,00€";
//! let table = reconstruct_table(text);
//!
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.rows[1].cells[4].format(), CellFormat::Currency('€'));
//! assert_eq!(estimate_column_widths(&table).len(), 6);
//! ```
//!
//! ## Converting documents
//!
//! ```no_run
//! fn main() -> retab::Result<()> {
//!     let result = retab::convert_file("invoice.pdf")?;
//!     std::fs::write(&result.file_name, &result.content)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Line classification**: headings, tab and space delimited rows, item lines
//! - **Type inference**: currency amounts, decimals, integers and dates
//! - **Spreadsheet output**: XLSX with number formats and column widths, or JSON
//! - **Pluggable extractors**: PDF (via lopdf) and plain text out of the box

pub mod convert;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod reconstruct;
pub mod write;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConvertResult, Converter, InputDocument, OutputFormat};
pub use detect::{detect_format_from_bytes, is_pdf_bytes, InputKind, PdfFormat};
pub use error::{Error, ErrorKind, Result};
pub use extract::{ErrorMode, ExtractOptions, ExtractorRegistry, TextExtractor};
pub use model::{Cell, CellFormat, CellValue, MergeRegion, Row, RowKind, Table};
pub use reconstruct::{ReconstructOptions, ReconstructStats, TableReconstructor, WidthOptions};
pub use write::{JsonFormat, JsonWriter, SpreadsheetWriter, XlsxWriter};

use std::path::Path;

/// Reconstruct a typed table from newline-delimited text.
///
/// Never fails: any input, including the empty string, yields a
/// rectangular (possibly empty) table.
///
/// # Example
///
/// ```
/// use retab::reconstruct_table;
///
/// let table = reconstruct_table("A1\tWidget\t3");
/// assert_eq!(table.column_count(), 3);
/// ```
pub fn reconstruct_table(text: &str) -> Table {
    TableReconstructor::new().reconstruct(text)
}

/// Reconstruct a table with custom options.
///
/// # Example
///
/// ```
/// use retab::{reconstruct_table_with_options, ReconstructOptions};
///
/// let options = ReconstructOptions::new().with_currency_symbol('$');
/// let table = reconstruct_table_with_options("Total  12.50$", &options);
/// assert!(table.rows[0].cells[1].is_typed());
/// ```
pub fn reconstruct_table_with_options(text: &str, options: &ReconstructOptions) -> Table {
    TableReconstructor::with_options(options.clone()).reconstruct(text)
}

/// Estimate one display width per column of a table, using default limits.
pub fn estimate_column_widths(table: &Table) -> Vec<usize> {
    reconstruct::estimate_column_widths(&table.rows, &WidthOptions::default())
}

/// Extract the text of a PDF or plain text file.
///
/// # Example
///
/// ```no_run
/// let text = retab::extract_text("invoice.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let input = InputDocument::from_path(path)?;
    Converter::new().extract_text(&input)
}

/// Convert a file to an XLSX workbook with default options.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    let input = InputDocument::from_path(path)?;
    Converter::new().convert(&input)
}

/// Convert an in-memory document to an XLSX workbook.
///
/// `name` is used to resolve the input kind and the output file name.
pub fn convert_bytes(bytes: &[u8], name: &str) -> Result<ConvertResult> {
    let input = InputDocument::new(bytes).with_name(name);
    Converter::new().convert(&input)
}
