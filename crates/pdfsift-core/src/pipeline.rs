//! Per-file pipeline: extract, OCR fallback, keyword test.
//!
//! Extraction and OCR failures are logged at the failure site and folded into
//! a typed [`FileOutcome`]; nothing a single file does can abort the batch.

use std::path::PathBuf;
use std::sync::Arc;

use crate::backend::{BackendError, PdfBackend};
use crate::keywords::KeywordMatcher;
use crate::ocr::{OcrEngine, ocr_output_path};
use crate::{FileOutcome, ScanFailure};

/// Shared state for one scan run, cloned into every worker.
pub struct ScanContext {
    pub backend: Arc<dyn PdfBackend>,
    pub ocr: Arc<dyn OcrEngine>,
    pub matcher: KeywordMatcher,
    pub input_folder: PathBuf,
    pub max_pages: usize,
}

/// Run the full pipeline for one file.
///
/// An extraction error is non-fatal: the text is treated as empty, which
/// sends the file down the OCR path like any scan without a text layer. An
/// OCR failure keeps whatever text was already extracted. The keyword test
/// always runs on the final text.
pub async fn process_file(ctx: &ScanContext, file_name: &str) -> FileOutcome {
    let path = ctx.input_folder.join(file_name);
    let mut failure: Option<ScanFailure> = None;

    let mut text = match extract_blocking(ctx.backend.clone(), path.clone(), ctx.max_pages).await {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            tracing::error!(file = file_name, error = %err, "error reading PDF");
            failure = Some(ScanFailure::Extraction(err.to_string()));
            String::new()
        }
        Err(err) => {
            tracing::error!(file = file_name, error = %err, "unexpected error during extraction");
            return FileOutcome::Failed(ScanFailure::Unexpected(err.to_string()));
        }
    };

    if text.trim().is_empty() {
        let ocr_path = ocr_output_path(&ctx.input_folder, file_name);
        match ctx.ocr.ocr_to_searchable(&path, &ocr_path).await {
            Ok(()) => {
                match extract_blocking(ctx.backend.clone(), ocr_path, ctx.max_pages).await {
                    Ok(Ok(ocr_text)) => {
                        // OCR recovered the file; an earlier extraction error
                        // is no longer the file's story.
                        failure = None;
                        text = ocr_text;
                    }
                    Ok(Err(err)) => {
                        tracing::error!(file = file_name, error = %err, "error reading OCR output");
                        failure = Some(ScanFailure::Extraction(err.to_string()));
                        text.clear();
                    }
                    Err(err) => {
                        tracing::error!(file = file_name, error = %err, "unexpected error during extraction");
                        return FileOutcome::Failed(ScanFailure::Unexpected(err.to_string()));
                    }
                }
            }
            Err(err) => {
                tracing::error!(file = file_name, error = %err, "OCR failed");
                failure = Some(ScanFailure::Ocr(err.to_string()));
            }
        }
    }

    if ctx.matcher.is_match(&text) {
        FileOutcome::Matched
    } else if let Some(failure) = failure {
        FileOutcome::Failed(failure)
    } else {
        FileOutcome::Unmatched
    }
}

/// Run blocking backend extraction off the async runtime.
///
/// The outer error means the blocking task panicked or was cancelled — the
/// "unexpected" channel of the pipeline.
async fn extract_blocking(
    backend: Arc<dyn PdfBackend>,
    path: PathBuf,
    max_pages: usize,
) -> Result<Result<String, BackendError>, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || backend.extract_text(&path, max_pages)).await
}
