//! Document text extraction.
//!
//! Turns an uploaded file (plain text, PDF, or DOCX) into raw text for the
//! pipeline. The format is declared by the file extension; a document from
//! which no text can be recovered is an extraction failure, never an empty
//! success.

mod docx;

use copyscan_shared::{CopyscanError, Result};

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Txt,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a file name's extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let extension = std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("txt") => Ok(Self::Txt),
            Some("pdf") => Ok(Self::Pdf),
            Some("docx") => Ok(Self::Docx),
            _ => Err(CopyscanError::unsupported_format(name)),
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract raw text from an uploaded document.
///
/// Corrupt bytes and documents with no textual content both surface as
/// extraction failures so the request layer can reject them up front.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String> {
    let format = DocumentFormat::from_file_name(file_name)?;
    let text = match format {
        DocumentFormat::Txt => extract_txt(bytes)?,
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => docx::extract_docx(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(CopyscanError::extraction(format!(
            "no text could be extracted from {file_name}"
        )));
    }

    tracing::debug!(file = %file_name, format = ?format, chars = text.len(), "document text extracted");
    Ok(text)
}

fn extract_txt(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| CopyscanError::extraction(format!("file is not valid UTF-8: {e}")))
}

fn extract_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| CopyscanError::extraction(format!("failed to extract PDF text: {e}")))
}
