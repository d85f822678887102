//! Fixed-size worker pool for per-file scan jobs.
//!
//! Workers drain a shared job queue and push one [`FileReport`] per job onto
//! the completion channel, in whatever order files finish. Once submitted,
//! every job runs to completion: no cancellation, no timeouts, no retries.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::FileReport;
use crate::pipeline::{ScanContext, process_file};

/// A file scan job submitted to the pool.
pub struct FileJob {
    pub file_name: String,
}

/// A pool of worker tasks processing file scan jobs.
///
/// Submit jobs via [`submit()`](ScanPool::submit); results arrive on the
/// completion channel handed to [`new()`](ScanPool::new).
pub struct ScanPool {
    job_tx: async_channel::Sender<FileJob>,
    pool_handle: JoinHandle<()>,
}

impl ScanPool {
    pub fn new(
        ctx: Arc<ScanContext>,
        report_tx: async_channel::Sender<FileReport>,
        num_workers: usize,
    ) -> Self {
        let (job_tx, job_rx) = async_channel::unbounded::<FileJob>();

        let pool_handle = tokio::spawn(async move {
            let mut handles = Vec::with_capacity(num_workers.max(1));
            for _ in 0..num_workers.max(1) {
                handles.push(tokio::spawn(worker_loop(
                    job_rx.clone(),
                    ctx.clone(),
                    report_tx.clone(),
                )));
            }

            // Drop our clones so workers are the last holders; the report
            // channel closes when the final worker exits.
            drop(job_rx);
            drop(report_tx);

            for h in handles {
                let _ = h.await;
            }
        });

        Self {
            job_tx,
            pool_handle,
        }
    }

    /// Submit a job to the pool.
    pub async fn submit(&self, job: FileJob) {
        let _ = self.job_tx.send(job).await;
    }

    /// Close the job queue. Workers finish whatever is already queued and
    /// then exit, closing the completion channel behind them. Consumers can
    /// therefore drain completions until `recv` errors, even if a worker
    /// died without reporting.
    pub fn close(&self) {
        self.job_tx.close();
    }

    /// Close the pool and wait for all workers to finish draining the queue.
    pub async fn shutdown(self) {
        self.job_tx.close();
        let _ = self.pool_handle.await;
    }
}

async fn worker_loop(
    job_rx: async_channel::Receiver<FileJob>,
    ctx: Arc<ScanContext>,
    report_tx: async_channel::Sender<FileReport>,
) {
    while let Ok(job) = job_rx.recv().await {
        let outcome = process_file(&ctx, &job.file_name).await;
        let _ = report_tx
            .send(FileReport {
                file_name: job.file_name,
                outcome,
            })
            .await;
    }
}
