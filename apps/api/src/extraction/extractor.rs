//! Text extraction: a pluggable, trait-based reader that turns uploaded bytes into raw text.
//!
//! Default: `PdfTextExtractor` (pdf-extract).
//! `AppState` holds an `Arc<dyn TextExtractor>`.

use crate::errors::AppError;

pub trait TextExtractor: Send + Sync {
    /// Extracts raw text from a whole document. Blocking; call from
    /// `spawn_blocking` in async contexts.
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError>;
}

pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError> {
        // pdf-extract panics on some malformed xref tables and font dictionaries.
        let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));
        match result {
            Ok(Ok(text)) => Ok(text.trim().to_string()),
            Ok(Err(e)) => Err(AppError::Extraction(format!("Failed to read PDF: {e}"))),
            Err(_) => Err(AppError::Extraction(
                "Failed to read PDF: malformed document".to_string(),
            )),
        }
    }
}
