use std::path::PathBuf;

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod ingest;
pub mod keywords;
pub mod ocr;
pub mod pipeline;
pub mod pool;
pub mod scanner;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use keywords::KeywordMatcher;
pub use ocr::{OCR_PREFIX, OcrEngine, OcrError, OcrmypdfEngine, ocr_output_path};
pub use scanner::scan_folder;

/// Keywords the original triage run looked for.
pub const DEFAULT_KEYWORDS: &[&str] = &["Trailer", "Boat", "12/31/2023"];
pub const DEFAULT_MAX_PAGES: usize = 5;
pub const DEFAULT_WORKER_COUNT: usize = 8;
pub const DEFAULT_MATCH_FILE: &str = "matching_files.txt";
pub const DEFAULT_LOG_FILE: &str = "pdf_scan.log";

/// Configuration for one scan run, passed explicitly into the orchestrator.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Folder containing the PDFs to scan.
    pub input_folder: PathBuf,
    /// Keywords matched case-insensitively against extracted text.
    pub keywords: Vec<String>,
    /// Pages read from the start of each document.
    pub max_pages: usize,
    /// Size of the worker pool.
    pub worker_count: usize,
    /// File that matching filenames are appended to.
    pub output_path: PathBuf,
    /// Log file path (written by the CLI's tracing setup, carried here so the
    /// whole run's configuration lives in one value).
    pub log_path: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("."),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            max_pages: DEFAULT_MAX_PAGES,
            worker_count: DEFAULT_WORKER_COUNT,
            output_path: PathBuf::from(DEFAULT_MATCH_FILE),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Why a file produced no usable result. Every failure is terminal for its
/// file only; the batch always runs to completion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanFailure {
    #[error("text extraction failed: {0}")]
    Extraction(String),
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Outcome of one file's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The extracted (or OCR-recovered) text contained a keyword.
    Matched,
    /// Processed cleanly, no keyword hit.
    Unmatched,
    /// No usable text and a failure was recorded along the way.
    Failed(ScanFailure),
}

/// One completed file, reported by a worker in completion order.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file_name: String,
    pub outcome: FileOutcome,
}

/// Progress events emitted during a scan.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Started {
        total: usize,
    },
    /// Emitted once per file, in completion order.
    FileCompleted {
        completed: usize,
        total: usize,
        report: FileReport,
    },
    /// Emitted every 100 completions and on the final completion.
    Progress {
        completed: usize,
        total: usize,
    },
    Completed {
        summary: ScanSummary,
    },
}

/// Counters for a complete scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub extraction_failures: usize,
    pub ocr_failures: usize,
    pub unexpected_failures: usize,
}

impl ScanSummary {
    pub fn failed(&self) -> usize {
        self.extraction_failures + self.ocr_failures + self.unexpected_failures
    }
}

/// Startup-time errors. Per-file problems never surface here — they are
/// logged and folded into the [`ScanSummary`].
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no keywords configured")]
    NoKeywords,
    #[error("invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("failed to read input folder {folder}: {source}")]
    ReadFolder {
        folder: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to open output file {path}: {source}")]
    OpenOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}
