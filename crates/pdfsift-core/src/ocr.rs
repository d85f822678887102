//! External OCR invocation.
//!
//! Files without a text layer are handed to `ocrmypdf`, which writes a
//! searchable copy next to the original. The engine is a trait so tests can
//! substitute a mock that never shells out.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

/// Prefix for OCR output files: `ocr_<name>` in the same folder.
pub const OCR_PREFIX: &str = "ocr_";

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("{command} exited with status {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Derive the OCR output path for `file_name` inside `folder`.
pub fn ocr_output_path(folder: &Path, file_name: &str) -> PathBuf {
    folder.join(format!("{OCR_PREFIX}{file_name}"))
}

/// An OCR engine that produces a searchable copy of a PDF.
///
/// After a returned error the output path must be treated as nonexistent —
/// callers never re-extract text from it.
pub trait OcrEngine: Send + Sync {
    fn ocr_to_searchable<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), OcrError>> + Send + 'a>>;
}

/// `ocrmypdf`-based engine. `--skip-text` leaves pages that already carry a
/// text layer untouched.
pub struct OcrmypdfEngine {
    binary: PathBuf,
}

impl Default for OcrmypdfEngine {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ocrmypdf"),
        }
    }
}

impl OcrmypdfEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl OcrEngine for OcrmypdfEngine {
    fn ocr_to_searchable<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), OcrError>> + Send + 'a>> {
        Box::pin(async move {
            let command = self.binary.display().to_string();
            let out = Command::new(&self.binary)
                .arg("--skip-text")
                .arg(input)
                .arg(output)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|source| OcrError::Spawn {
                    command: command.clone(),
                    source,
                })?;

            if out.status.success() {
                Ok(())
            } else {
                Err(OcrError::Failed {
                    command,
                    code: out.status.code(),
                    stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_gets_prefix() {
        let path = ocr_output_path(Path::new("/scans"), "invoice.pdf");
        assert_eq!(path, PathBuf::from("/scans/ocr_invoice.pdf"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonexistent_binary_is_a_spawn_error() {
        let engine = OcrmypdfEngine::new("/nonexistent/ocrmypdf");
        let err = engine
            .ocr_to_searchable(Path::new("in.pdf"), Path::new("out.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_reports_failure() {
        // `false` ignores its arguments and exits 1.
        let engine = OcrmypdfEngine::new("false");
        let err = engine
            .ocr_to_searchable(Path::new("in.pdf"), Path::new("out.pdf"))
            .await
            .unwrap_err();
        match err {
            OcrError::Failed { code, .. } => assert_eq!(code, Some(1)),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
