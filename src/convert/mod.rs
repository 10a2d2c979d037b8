//! End-to-end conversion from a source document to a spreadsheet file.
//!
//! The converter checks the input, picks a text extractor, reconstructs a
//! typed table from the text, estimates column widths and hands the result
//! to a spreadsheet writer.
//!
//! # Example
//!
//! ```no_run
//! use retab::convert::{ConvertOptions, Converter, InputDocument};
//!
//! fn main() -> retab::Result<()> {
//!     let converter = Converter::with_options(ConvertOptions::new().with_sheet_name("Invoice"));
//!     let input = InputDocument::from_path("invoice.pdf")?;
//!     let result = converter.convert(&input)?;
//!     std::fs::write(&result.file_name, &result.content)?;
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use crate::detect::InputKind;
use crate::error::{Error, Result};
use crate::extract::{ExtractOptions, ExtractorRegistry, TextExtractor};
use crate::model::Table;
use crate::reconstruct::{
    estimate_column_widths, ReconstructOptions, ReconstructStats, TableReconstructor, WidthOptions,
};
use crate::write::{
    sanitize_sheet_name, JsonWriter, SpreadsheetWriter, XlsxWriter, DEFAULT_SHEET_NAME,
};

/// Fallback stem when the input has no usable name.
const DEFAULT_OUTPUT_STEM: &str = "output";

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Text extraction options
    pub extract: ExtractOptions,

    /// Table reconstruction options
    pub reconstruct: ReconstructOptions,

    /// Column width options
    pub widths: WidthOptions,

    /// Worksheet name
    pub sheet_name: String,

    /// Output format
    pub output_format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Set reconstruction options.
    pub fn with_reconstruct_options(mut self, options: ReconstructOptions) -> Self {
        self.reconstruct = options;
        self
    }

    /// Set column width options.
    pub fn with_width_options(mut self, options: WidthOptions) -> Self {
        self.widths = options;
        self
    }

    /// Set the worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            reconstruct: ReconstructOptions::default(),
            widths: WidthOptions::default(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            output_format: OutputFormat::default(),
        }
    }
}

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Office Open XML workbook
    #[default]
    Xlsx,

    /// JSON sheet document
    Json,
}

impl OutputFormat {
    /// File extension of the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Other(format!("Unknown output format: {}", other))),
        }
    }
}

/// A document submitted for conversion.
#[derive(Debug, Clone, Default)]
pub struct InputDocument {
    /// Original file name, if known
    pub name: Option<String>,

    /// Declared MIME type, if known
    pub mime_type: Option<String>,

    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl InputDocument {
    /// Create an input from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: None,
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    /// Read an input from a file; the file name is kept.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from);
        Ok(Self {
            name,
            mime_type: None,
            bytes,
        })
    }

    /// Set the file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Check if there is anything to convert.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Encoded output file
    pub content: Vec<u8>,

    /// Suggested output file name
    pub file_name: String,

    /// MIME type of the output
    pub mime_type: String,

    /// Reconstruction statistics
    pub stats: ReconstructStats,
}

impl ConvertResult {
    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Converts documents into spreadsheets.
pub struct Converter {
    registry: ExtractorRegistry,
    reconstructor: TableReconstructor,
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with default options and extractors.
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a converter with custom options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self::with_registry(ExtractorRegistry::with_defaults(), options)
    }

    /// Create a converter with a custom extractor registry.
    pub fn with_registry(registry: ExtractorRegistry, options: ConvertOptions) -> Self {
        Self {
            registry,
            reconstructor: TableReconstructor::with_options(options.reconstruct.clone()),
            options,
        }
    }

    /// Register an additional extractor.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        self.registry.register(extractor);
    }

    /// Get the options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Pick the extractor for an input.
    ///
    /// A declared MIME type decides alone; otherwise the file extension is
    /// used, and as a last resort the payload is sniffed.
    pub fn resolve(&self, input: &InputDocument) -> Result<Arc<dyn TextExtractor>> {
        if input.is_empty() {
            return Err(Error::MissingInput);
        }

        if let Some(mime) = input.mime_type.as_deref().filter(|m| !is_generic_mime(m)) {
            return self
                .registry
                .get_by_mime_type(mime)
                .ok_or_else(|| Error::UnsupportedInput(mime.to_string()));
        }

        if let Some(name) = input.name.as_deref() {
            if let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) {
                return self
                    .registry
                    .get_by_extension(ext)
                    .ok_or_else(|| Error::UnsupportedInput(name.to_string()));
            }
        }

        InputKind::sniff(&input.bytes)
            .and_then(|kind| self.registry.get_by_kind(kind))
            .ok_or_else(|| Error::UnsupportedInput("unrecognized content".to_string()))
    }

    /// Extract the text of an input.
    pub fn extract_text(&self, input: &InputDocument) -> Result<String> {
        let extractor = self.resolve(input)?;
        log::debug!(
            "Extracting {} with '{}' extractor",
            input.name.as_deref().unwrap_or("<unnamed>"),
            extractor.name()
        );
        extractor.extract(&input.bytes, &self.options.extract)
    }

    /// Extract and reconstruct the table of an input.
    pub fn reconstruct(&self, input: &InputDocument) -> Result<(Table, ReconstructStats)> {
        let text = self.extract_text(input)?;
        Ok(self.reconstructor.reconstruct_with_stats(&text))
    }

    /// Convert an input into a spreadsheet file.
    pub fn convert(&self, input: &InputDocument) -> Result<ConvertResult> {
        let (table, stats) = self.reconstruct(input)?;
        let widths = estimate_column_widths(&table.rows, &self.options.widths);

        let writer = self.writer();
        let content = writer.write(&table, &widths)?;
        let file_name = output_file_name(input.name.as_deref(), writer.extension());

        log::debug!(
            "Converted to {} ({} bytes, {} rows, {} columns)",
            file_name,
            content.len(),
            table.row_count(),
            widths.len()
        );

        Ok(ConvertResult {
            content,
            file_name,
            mime_type: writer.mime_type().to_string(),
            stats,
        })
    }

    fn writer(&self) -> Box<dyn SpreadsheetWriter> {
        match self.options.output_format {
            OutputFormat::Xlsx => {
                Box::new(XlsxWriter::new().with_sheet_name(&self.options.sheet_name))
            }
            OutputFormat::Json => Box::new(
                JsonWriter::new().with_sheet_name(sanitize_sheet_name(&self.options.sheet_name)),
            ),
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// Output file name for an input name: its stem plus `extension`.
///
/// `report.pdf` becomes `report.xlsx`; without a usable name the stem is
/// `output`.
pub fn output_file_name(input_name: Option<&str>, extension: &str) -> String {
    let stem = input_name
        .map(Path::new)
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_OUTPUT_STEM);
    format!("{}.{}", stem, extension)
}

/// MIME types that say nothing about the content.
fn is_generic_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    essence.is_empty() || essence.eq_ignore_ascii_case("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const INVOICE: &str = "INVOICE\nA1  Widget  pcs  3  10,00€  30,00€\n";

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_sheet_name("Reporte")
            .with_format(OutputFormat::Json)
            .with_extract_options(ExtractOptions::new().with_max_pages(2));

        assert_eq!(options.sheet_name, "Reporte");
        assert_eq!(options.output_format, OutputFormat::Json);
        assert_eq!(options.extract.max_pages, 2);
        assert_eq!(ConvertOptions::default().sheet_name, "Report");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("XLSX".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(Some("report.pdf"), "xlsx"), "report.xlsx");
        assert_eq!(
            output_file_name(Some("scans/march.invoice.pdf"), "xlsx"),
            "march.invoice.xlsx"
        );
        assert_eq!(output_file_name(Some("notes"), "json"), "notes.json");
        assert_eq!(output_file_name(None, "xlsx"), "output.xlsx");
    }

    // ==================== Input checks ====================

    #[test]
    fn test_missing_input() {
        let result = Converter::new().convert(&InputDocument::default().with_name("a.pdf"));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::MissingInput));
        assert_eq!(err.kind(), ErrorKind::MissingInput);
    }

    #[test]
    fn test_wrong_mime_type() {
        let input = InputDocument::new(INVOICE.as_bytes())
            .with_name("invoice.pdf")
            .with_mime_type("image/png");
        let err = Converter::new().convert(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongInputKind);
    }

    #[test]
    fn test_wrong_extension() {
        let input = InputDocument::new(INVOICE.as_bytes()).with_name("invoice.docx");
        let err = Converter::new().convert(&input).unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput(ref n) if n == "invoice.docx"));
    }

    #[test]
    fn test_mime_type_wins_over_extension() {
        let input = InputDocument::new(INVOICE.as_bytes())
            .with_name("invoice.docx")
            .with_mime_type("text/plain");
        assert_eq!(Converter::new().resolve(&input).unwrap().name(), "text");
    }

    #[test]
    fn test_generic_mime_falls_back_to_sniffing() {
        let input =
            InputDocument::new(INVOICE.as_bytes()).with_mime_type("application/octet-stream");
        assert_eq!(Converter::new().resolve(&input).unwrap().name(), "text");

        let binary = InputDocument::new(vec![0xFFu8, 0xFE, 0x00]);
        let err = Converter::new().resolve(&binary).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::WrongInputKind);
    }

    // ==================== Conversion ====================

    #[test]
    fn test_convert_text_to_json() {
        let converter =
            Converter::with_options(ConvertOptions::new().with_format(OutputFormat::Json));
        let input = InputDocument::new(INVOICE.as_bytes()).with_name("invoice.txt");
        let result = converter.convert(&input).unwrap();

        assert_eq!(result.file_name, "invoice.json");
        assert_eq!(result.mime_type, "application/json");
        assert_eq!(result.stats.heading_rows, 1);
        assert_eq!(result.stats.space_rows, 1);
        assert_eq!(result.stats.currency_cells, 2);

        let parsed: serde_json::Value = serde_json::from_slice(&result.content).unwrap();
        assert_eq!(parsed["sheet"], "Report");
        assert_eq!(parsed["column_widths"].as_array().unwrap().len(), 6);
        assert_eq!(parsed["rows"][1]["cells"][3]["value"]["type"], "integer");
    }

    #[test]
    fn test_convert_text_to_xlsx() {
        let input = InputDocument::new(INVOICE.as_bytes());
        let result = Converter::new().convert(&input).unwrap();

        assert_eq!(result.file_name, "output.xlsx");
        assert_eq!(
            result.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert!(result.content.starts_with(b"PK"));
        assert!(result.content_len() > 0);
    }
}
