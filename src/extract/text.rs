//! Plain text passthrough.

use crate::detect::InputKind;
use crate::error::Result;

use super::{ExtractOptions, TextExtractor};

/// Extractor for documents that already are UTF-8 text.
///
/// The page limit does not apply; the byte-order mark is dropped.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor {
    _private: (),
}

impl PlainTextExtractor {
    /// Create a new plain text extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "text"
    }

    fn kind(&self) -> InputKind {
        InputKind::Text
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn mime_types(&self) -> &[&str] {
        &["text/plain"]
    }

    fn extract(&self, bytes: &[u8], options: &ExtractOptions) -> Result<String> {
        let text = String::from_utf8(bytes.to_vec())?;
        let text = match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };
        Ok(options.finish(text))
    }
}
