//! Scan orchestration and result aggregation.
//!
//! A single consumer drains the pool's completion channel and performs all
//! writes to the match file itself, so worker tasks never share a file
//! handle.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;

use crate::ingest::enumerate_pdfs;
use crate::keywords::KeywordMatcher;
use crate::ocr::OcrEngine;
use crate::pipeline::ScanContext;
use crate::pool::{FileJob, ScanPool};
use crate::{
    FileOutcome, FileReport, PdfBackend, ScanConfig, ScanError, ScanEvent, ScanFailure,
    ScanSummary,
};

/// How often a progress line is emitted, in completions.
const PROGRESS_INTERVAL: usize = 100;

/// Scan a folder of PDFs for the configured keywords.
///
/// One pipeline job per candidate file runs on a fixed-size worker pool;
/// matching filenames are appended to the match file (and flushed) as they
/// complete, so partial results survive a crash. Progress events are emitted
/// via the callback.
///
/// Per-file failures are logged and counted, never propagated: the returned
/// error covers only startup problems (bad keywords, unreadable folder,
/// unopenable output file).
pub async fn scan_folder(
    config: &ScanConfig,
    backend: Arc<dyn PdfBackend>,
    ocr: Arc<dyn OcrEngine>,
    progress: impl Fn(ScanEvent) + Send + Sync + 'static,
) -> Result<ScanSummary, ScanError> {
    let matcher = KeywordMatcher::new(&config.keywords)?;
    let files = enumerate_pdfs(&config.input_folder)?;
    let total = files.len();

    tracing::info!(total, folder = %config.input_folder.display(), "starting scan");
    progress(ScanEvent::Started { total });

    // Append mode: results from earlier runs are never clobbered.
    let mut output = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.output_path)
        .map_err(|source| ScanError::OpenOutput {
            path: config.output_path.clone(),
            source,
        })?;

    let ctx = Arc::new(ScanContext {
        backend,
        ocr,
        matcher,
        input_folder: config.input_folder.clone(),
        max_pages: config.max_pages,
    });

    let (report_tx, report_rx) = async_channel::unbounded::<FileReport>();
    let pool = ScanPool::new(ctx, report_tx, config.worker_count);

    for file_name in files {
        pool.submit(FileJob { file_name }).await;
    }
    // Everything is queued; close the queue so workers exit as it drains and
    // the completion channel closes behind them. The drain loop then ends on
    // channel closure rather than waiting for a fixed report count, so a
    // worker that dies mid-file cannot stall it.
    pool.close();

    let mut summary = ScanSummary {
        total,
        ..Default::default()
    };
    let mut completed = 0usize;

    while let Ok(report) = report_rx.recv().await {
        completed += 1;

        match &report.outcome {
            FileOutcome::Matched => {
                summary.matched += 1;
                match writeln!(output, "{}", report.file_name).and_then(|_| output.flush()) {
                    Ok(()) => tracing::info!(file = %report.file_name, "match found"),
                    Err(err) => {
                        tracing::error!(file = %report.file_name, error = %err, "failed to record match")
                    }
                }
            }
            FileOutcome::Unmatched => summary.unmatched += 1,
            FileOutcome::Failed(failure) => match failure {
                ScanFailure::Extraction(_) => summary.extraction_failures += 1,
                ScanFailure::Ocr(_) => summary.ocr_failures += 1,
                ScanFailure::Unexpected(_) => summary.unexpected_failures += 1,
            },
        }

        progress(ScanEvent::FileCompleted {
            completed,
            total,
            report,
        });

        if completed % PROGRESS_INTERVAL == 0 || completed == total {
            tracing::info!(completed, total, "processed");
            progress(ScanEvent::Progress { completed, total });
        }
    }

    pool.shutdown().await;

    if completed < total {
        tracing::error!(
            completed,
            total,
            "some files produced no report; a worker terminated abnormally"
        );
    }

    tracing::info!(
        matched = summary.matched,
        failed = summary.failed(),
        total,
        "scan complete"
    );
    progress(ScanEvent::Completed {
        summary: summary.clone(),
    });

    Ok(summary)
}
