//! Error types for retab library.

use std::io;
use thiserror::Error;

/// Result type alias for retab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around table reconstruction.
///
/// The reconstruction core itself is total and never returns these; they
/// come from the boundary adapters (input detection, text extraction and
/// spreadsheet writing).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No input payload was supplied.
    #[error("No input document was provided")]
    MissingInput,

    /// The input is not a kind of document any extractor handles.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// The payload does not carry the expected magic bytes.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Encoding error.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Error serializing the spreadsheet payload.
    #[error("Spreadsheet writing error: {0}")]
    Write(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Boundary-level classification of an [`Error`].
///
/// An outer layer (HTTP handler, CLI) reports each kind with its own
/// message and status; none of them is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing to convert.
    MissingInput,
    /// The payload is not a document kind we accept.
    WrongInputKind,
    /// Extraction or writing failed for an unrelated reason.
    Processing,
}

impl ErrorKind {
    /// User-facing message for this kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::MissingInput => "No file was provided",
            ErrorKind::WrongInputKind => "The file must be a PDF or plain text document",
            ErrorKind::Processing => "The document could not be processed",
        }
    }

    /// HTTP-style status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::MissingInput | ErrorKind::WrongInputKind => 400,
            ErrorKind::Processing => 500,
        }
    }
}

impl Error {
    /// Classify this error into one of the boundary kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingInput => ErrorKind::MissingInput,
            Error::UnsupportedInput(_) | Error::UnknownFormat | Error::UnsupportedVersion(_) => {
                ErrorKind::WrongInputKind
            }
            _ => ErrorKind::Processing,
        }
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Write(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Write(format!("JSON serialization error: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
