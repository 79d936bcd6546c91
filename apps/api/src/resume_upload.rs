//! Text extraction for uploaded resume files.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    PlainText,
    Pdf,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported resume file type '{0}' (expected .txt, .md or .pdf)")]
    UnsupportedType(String),

    #[error("Could not extract text from PDF: {0}")]
    Pdf(String),

    #[error("Uploaded resume contains no text")]
    Empty,
}

/// Picks the extraction method from the file extension.
pub fn detect_format(file_name: &str) -> Result<ResumeFormat, UploadError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "md" => Ok(ResumeFormat::PlainText),
        "pdf" => Ok(ResumeFormat::Pdf),
        _ => Err(UploadError::UnsupportedType(file_name.to_string())),
    }
}

/// Extracts plain text from an uploaded resume. CPU-bound for PDFs; call via `spawn_blocking`.
pub fn extract_resume_text(file_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
    let text = match detect_format(file_name)? {
        ResumeFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        ResumeFormat::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| UploadError::Pdf(e.to_string()))?
        }
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(UploadError::Empty);
    }
    Ok(text)
}
