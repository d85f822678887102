use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level text extraction step; the per-file
/// pipeline ([`crate::pipeline`]) decides what a failure means for the scan.
pub trait PdfBackend: Send + Sync {
    /// Extract the concatenated text of pages `[0, min(max_pages, page_count))`.
    ///
    /// Extraction is blocking; callers on an async runtime run it under
    /// `spawn_blocking`.
    fn extract_text(&self, path: &Path, max_pages: usize) -> Result<String, BackendError>;
}
