//! Resume parsing: document text extraction plus the heuristic field
//! extractors, skill matcher and ATS scorer that run over the extracted text.

pub mod docx;
pub mod fields;
pub mod pdf;
pub mod similarity;
pub mod skills;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Prefix that marks a hyperlink target as an email address.
pub const MAILTO_PREFIX: &str = "mailto:";

/// Supported upload formats. Resolved once from the file name; everything
/// downstream matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Docx,
    Pdf,
}

impl FileKind {
    /// Resolves the kind from a file name's extension, case-insensitively.
    /// Returns `None` for anything that is not `.docx` or `.pdf`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "docx" => Some(FileKind::Docx),
            "pdf" => Some(FileKind::Pdf),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Missing document part: {0}")]
    MissingPart(&'static str),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("PDF text extraction panicked")]
    Panicked,
}

/// Extracts plain text from the document at `path`, appending any `mailto:`
/// hyperlink targets as extra lines.
pub fn extract_text(path: &Path, kind: FileKind) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    match kind {
        FileKind::Docx => docx::extract_text(&bytes),
        FileKind::Pdf => pdf::extract_text(&bytes),
    }
}
