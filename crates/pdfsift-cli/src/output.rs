use std::io::Write;

use owo_colors::OwoColorize;
use pdfsift_core::{ScanConfig, ScanSummary};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the end-of-run summary.
pub fn print_summary(
    w: &mut dyn Write,
    config: &ScanConfig,
    summary: &ScanSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    let failed = summary.failed();

    writeln!(w)?;
    if color.enabled() {
        write!(
            w,
            "Scanned {} files: {} matched, {} clean",
            summary.total,
            summary.matched.green(),
            summary.unmatched
        )?;
        if failed > 0 {
            writeln!(w, ", {} failed", failed.red())?;
        } else {
            writeln!(w, ", {} failed", failed)?;
        }
    } else {
        writeln!(
            w,
            "Scanned {} files: {} matched, {} clean, {} failed",
            summary.total, summary.matched, summary.unmatched, failed
        )?;
    }

    if failed > 0 {
        writeln!(
            w,
            "  failures: {} extraction, {} OCR, {} unexpected",
            summary.extraction_failures, summary.ocr_failures, summary.unexpected_failures
        )?;
    }

    if summary.matched > 0 {
        writeln!(w, "Matches appended to {}", config.output_path.display())?;
    }

    Ok(())
}
