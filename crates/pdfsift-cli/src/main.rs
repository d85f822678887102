use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pdfsift_core::{OcrmypdfEngine, ScanConfig, ScanEvent, config_file};
use pdfsift_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// Scan a folder of PDFs for keywords, OCRing files without a text layer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder containing the PDFs to scan
    folder: Option<PathBuf>,

    /// Keyword to search for (repeat the flag or comma-separate)
    #[arg(short, long = "keyword", value_delimiter = ',')]
    keywords: Vec<String>,

    /// Pages to read from the start of each document
    #[arg(long)]
    max_pages: Option<usize>,

    /// Worker pool size
    #[arg(long)]
    workers: Option<usize>,

    /// File that matching filenames are appended to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// ocrmypdf executable used for files without a text layer
    #[arg(long)]
    ocr_bin: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Suppress log lines on stdout (the log file is still written)
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let file_config = config_file::load_config();
    let scan = file_config.scan.unwrap_or_default();
    let concurrency = file_config.concurrency.unwrap_or_default();
    let out = file_config.output.unwrap_or_default();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let input_folder = args
        .folder
        .or_else(|| scan.folder.map(PathBuf::from))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no input folder given (pass one as an argument or set [scan] folder in .pdfsift.toml)"
            )
        })?;
    if !input_folder.is_dir() {
        anyhow::bail!("input folder not found: {}", input_folder.display());
    }

    let keywords = if args.keywords.is_empty() {
        scan.keywords.unwrap_or_else(|| {
            pdfsift_core::DEFAULT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect()
        })
    } else {
        args.keywords
    };

    let config = ScanConfig {
        input_folder,
        keywords,
        max_pages: args
            .max_pages
            .or(scan.max_pages)
            .unwrap_or(pdfsift_core::DEFAULT_MAX_PAGES),
        worker_count: args
            .workers
            .or(concurrency.worker_count)
            .unwrap_or(pdfsift_core::DEFAULT_WORKER_COUNT),
        output_path: args
            .output
            .or_else(|| out.match_file.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(pdfsift_core::DEFAULT_MATCH_FILE)),
        log_path: args
            .log_file
            .or_else(|| out.log_file.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(pdfsift_core::DEFAULT_LOG_FILE)),
    };

    let ocr_bin = args
        .ocr_bin
        .or_else(|| std::env::var("OCRMYPDF_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("ocrmypdf"));

    let _guard = init_tracing(&config.log_path, args.quiet)?;

    let color = ColorMode(!args.no_color);

    // Progress bar lives on stderr so it never interleaves with stdout logs.
    let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/dim}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=> "),
    );

    let backend = Arc::new(MupdfBackend::new());
    let ocr = Arc::new(OcrmypdfEngine::new(ocr_bin));

    let bar_events = bar.clone();
    let summary = pdfsift_core::scan_folder(&config, backend, ocr, move |event| match event {
        ScanEvent::Started { total } => bar_events.set_length(total as u64),
        ScanEvent::FileCompleted { .. } => bar_events.inc(1),
        ScanEvent::Completed { .. } => bar_events.finish_and_clear(),
        ScanEvent::Progress { .. } => {}
    })
    .await?;

    let mut stdout = std::io::stdout();
    output::print_summary(&mut stdout, &config, &summary, color)?;

    // A run where every file errored still exits 0: per-file failures live in
    // the log and the summary, not the exit status.
    Ok(())
}

/// Install tracing with an appending file layer for the log file, plus a
/// stdout layer unless `quiet`. The returned guard must stay alive for the
/// duration of the run so buffered log lines are flushed.
fn init_tracing(
    log_path: &Path,
    quiet: bool,
) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("invalid log file path: {}", log_path.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(file_writer),
        )
        .with((!quiet).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stdout)
        }))
        .init();

    Ok(guard)
}
