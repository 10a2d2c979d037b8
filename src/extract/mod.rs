//! Text extraction from source documents.
//!
//! Extractors turn a binary document into newline-delimited text, the only
//! input table reconstruction needs. The registry dispatches on file
//! extension or [`InputKind`].
//!
//! # Example
//!
//! ```no_run
//! use retab::extract::{ExtractOptions, ExtractorRegistry};
//!
//! fn main() -> retab::Result<()> {
//!     let registry = ExtractorRegistry::with_defaults();
//!     let bytes = std::fs::read("invoice.pdf")?;
//!     let extractor = registry.get_by_extension("pdf").expect("pdf support");
//!     let text = extractor.extract(&bytes, &ExtractOptions::new().with_max_pages(2))?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

#[cfg(feature = "pdf")]
mod pdf;
mod text;

#[cfg(feature = "pdf")]
pub use pdf::PdfTextExtractor;
pub use text::PlainTextExtractor;

use crate::detect::InputKind;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// How to treat a page that fails to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Fail the whole extraction
    #[default]
    Strict,
    /// Log and skip the page
    Lenient,
}

/// Options for text extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Maximum number of pages to read (0 = unlimited)
    pub max_pages: u32,

    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Normalize extracted text to Unicode NFC
    pub normalize_unicode: bool,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of pages (0 = unlimited).
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Enable lenient mode (skip pages that fail).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Page budget as a count usable with `Iterator::take`.
    pub fn page_limit(&self) -> usize {
        if self.max_pages == 0 {
            usize::MAX
        } else {
            self.max_pages as usize
        }
    }

    /// Apply post-extraction text normalization.
    pub fn finish(&self, text: String) -> String {
        if self.normalize_unicode {
            text.nfc().collect()
        } else {
            text
        }
    }
}

/// Trait for text extractors.
///
/// Implement this trait to support a new kind of source document.
pub trait TextExtractor: Send + Sync {
    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// Input kind handled by this extractor.
    fn kind(&self) -> InputKind;

    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// MIME types accepted by this extractor.
    fn mime_types(&self) -> &[&str];

    /// Extract newline-delimited text from a document payload.
    fn extract(&self, bytes: &[u8], options: &ExtractOptions) -> Result<String>;

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for text extractors.
pub struct ExtractorRegistry {
    by_extension: HashMap<String, Arc<dyn TextExtractor>>,
    by_mime_type: HashMap<String, Arc<dyn TextExtractor>>,
    by_kind: HashMap<InputKind, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_extension: HashMap::new(),
            by_mime_type: HashMap::new(),
            by_kind: HashMap::new(),
        }
    }

    /// Create a registry with the built-in extractors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        #[cfg(feature = "pdf")]
        registry.register(Arc::new(PdfTextExtractor::new()));
        registry.register(Arc::new(PlainTextExtractor::new()));
        registry
    }

    /// Register an extractor for its kind, extensions and MIME types.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        for ext in extractor.supported_extensions() {
            self.by_extension
                .insert(ext.to_lowercase(), extractor.clone());
        }
        for mime in extractor.mime_types() {
            self.by_mime_type
                .insert(mime.to_lowercase(), extractor.clone());
        }
        self.by_kind.insert(extractor.kind(), extractor);
    }

    /// Get an extractor by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_extension.get(&ext.to_lowercase()).cloned()
    }

    /// Get an extractor by MIME type, ignoring parameters.
    pub fn get_by_mime_type(&self, mime: &str) -> Option<Arc<dyn TextExtractor>> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        self.by_mime_type.get(&essence.to_lowercase()).cloned()
    }

    /// Get an extractor by input kind.
    pub fn get_by_kind(&self, kind: InputKind) -> Option<Arc<dyn TextExtractor>> {
        self.by_kind.get(&kind).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.by_extension.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.by_extension.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
