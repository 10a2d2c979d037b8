//! PDF text extraction using lopdf.

use lopdf::Document as LopdfDocument;

use crate::detect::{detect_format_from_bytes, InputKind};
use crate::error::{Error, Result};

use super::{ErrorMode, ExtractOptions, TextExtractor};

/// Extractor for PDF documents.
///
/// Pages are read in order and joined with a newline. Encrypted documents
/// are rejected.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    _private: (),
}

impl PdfTextExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn load(&self, bytes: &[u8]) -> Result<LopdfDocument> {
        let format = detect_format_from_bytes(bytes)?;
        log::debug!("Loading {} ({} bytes)", format, bytes.len());

        let doc = LopdfDocument::load_mem(bytes)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(doc)
    }
}

impl TextExtractor for PdfTextExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn kind(&self) -> InputKind {
        InputKind::Pdf
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn mime_types(&self) -> &[&str] {
        &["application/pdf"]
    }

    fn extract(&self, bytes: &[u8], options: &ExtractOptions) -> Result<String> {
        let doc = self.load(bytes)?;
        let pages = doc.get_pages();
        let page_numbers: Vec<u32> = pages.keys().copied().take(options.page_limit()).collect();
        log::debug!(
            "Extracting text from {} of {} pages",
            page_numbers.len(),
            pages.len()
        );

        let mut texts = Vec::with_capacity(page_numbers.len());
        for page_num in page_numbers {
            match doc.extract_text(&[page_num]) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    if options.error_mode == ErrorMode::Strict {
                        return Err(Error::TextExtract(format!("Page {}: {}", page_num, e)));
                    }
                    log::warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        Ok(options.finish(texts.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_texts.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extract_all_pages() {
        let bytes = build_pdf(&["INVOICE", "TOTALS"]);
        let text = PdfTextExtractor::new()
            .extract(&bytes, &ExtractOptions::default())
            .unwrap();
        assert!(text.contains("INVOICE"));
        assert!(text.contains("TOTALS"));
        assert!(text.find("INVOICE") < text.find("TOTALS"));
    }

    #[test]
    fn test_page_limit() {
        let bytes = build_pdf(&["FIRSTPAGE", "SECONDPAGE"]);
        let text = PdfTextExtractor::new()
            .extract(&bytes, &ExtractOptions::new().with_max_pages(1))
            .unwrap();
        assert!(text.contains("FIRSTPAGE"));
        assert!(!text.contains("SECONDPAGE"));
    }

    #[test]
    fn test_rejects_non_pdf() {
        let result = PdfTextExtractor::new().extract(b"A1\tWidget", &ExtractOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_corrupt_body_is_processing_error() {
        let result =
            PdfTextExtractor::new().extract(b"%PDF-1.7\nnot really a pdf", &ExtractOptions::default());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Processing);
    }
}
