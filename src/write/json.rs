//! JSON rendering of reconstructed tables.

use serde::Serialize;

use crate::error::Result;
use crate::model::{CellFormat, CellValue, MergeRegion, Table};

use super::SpreadsheetWriter;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Writes a table as a JSON sheet document.
#[derive(Debug, Clone)]
pub struct JsonWriter {
    sheet_name: String,
    format: JsonFormat,
}

#[derive(Serialize)]
struct JsonSheet<'a> {
    sheet: &'a str,
    column_widths: &'a [usize],
    rows: Vec<JsonRow<'a>>,
    merges: Vec<String>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    kind: &'static str,
    cells: Vec<JsonCell<'a>>,
}

#[derive(Serialize)]
struct JsonCell<'a> {
    raw: &'a str,
    format: CellFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    number_format: Option<String>,
    value: &'a CellValue,
}

impl JsonWriter {
    /// Create a JSON writer with default settings.
    pub fn new() -> Self {
        Self {
            sheet_name: super::DEFAULT_SHEET_NAME.to_string(),
            format: JsonFormat::default(),
        }
    }

    /// Set the sheet name recorded in the output.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Render a table to a JSON string.
    pub fn to_json(&self, table: &Table, widths: &[usize]) -> Result<String> {
        let sheet = JsonSheet {
            sheet: &self.sheet_name,
            column_widths: widths,
            rows: table
                .rows
                .iter()
                .map(|row| JsonRow {
                    kind: row.kind.name(),
                    cells: row
                        .cells
                        .iter()
                        .map(|cell| JsonCell {
                            raw: cell.raw(),
                            format: cell.format(),
                            number_format: cell.format().number_format(),
                            value: cell.value(),
                        })
                        .collect(),
                })
                .collect(),
            merges: table.merges.iter().map(MergeRegion::a1_range).collect(),
        };

        let json = match self.format {
            JsonFormat::Pretty => serde_json::to_string_pretty(&sheet)?,
            JsonFormat::Compact => serde_json::to_string(&sheet)?,
        };
        Ok(json)
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetWriter for JsonWriter {
    fn name(&self) -> &str {
        "json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn mime_type(&self) -> &str {
        "application/json"
    }

    fn write(&self, table: &Table, widths: &[usize]) -> Result<Vec<u8>> {
        Ok(self.to_json(table, widths)?.into_bytes())
    }
}
