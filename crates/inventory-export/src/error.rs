//! # Export Error Types
//!
//! Failures while turning a view into bytes or bytes into rows. An encoder
//! that fails never hands back partial output.

use thiserror::Error;

/// Export and import codec errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("CSV encoding failed: {0}")]
    CsvEncode(String),

    /// A row of an uploaded file could not be decoded.
    ///
    /// ## When This Occurs
    /// - Missing or extra columns
    /// - A quantity that is not an integer
    /// - Invalid UTF-8
    #[error("Malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: u64, reason: String },

    /// The header row is not `item_code,item_name,category,quantity`.
    #[error("Unexpected CSV header: expected '{expected}', found '{found}'")]
    UnexpectedHeader { expected: String, found: String },

    /// The PDF writer failed.
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

impl From<lopdf::Error> for ExportError {
    fn from(err: lopdf::Error) -> Self {
        ExportError::Render(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Render(err.to_string())
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
