//! Candidate file enumeration.

use std::path::Path;

use crate::ScanError;
use crate::ocr::OCR_PREFIX;

/// List PDF file names in `folder`, sorted for deterministic submission order.
///
/// Matching is on the `.pdf` extension, case-insensitive. Prior OCR artifacts
/// (`ocr_*`) are excluded: they also end in `.pdf`, and re-OCRing them on a
/// second run over the same folder would only pile up `ocr_ocr_*` copies.
pub fn enumerate_pdfs(folder: &Path) -> Result<Vec<String>, ScanError> {
    let entries = std::fs::read_dir(folder).map_err(|source| ScanError::ReadFolder {
        folder: folder.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    let mut skipped_artifacts = 0usize;
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::ReadFolder {
            folder: folder.to_path_buf(),
            source,
        })?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.to_ascii_lowercase().ends_with(".pdf") {
            continue;
        }
        if name.starts_with(OCR_PREFIX) {
            skipped_artifacts += 1;
            continue;
        }
        files.push(name.to_string());
    }

    if skipped_artifacts > 0 {
        tracing::info!(
            skipped_artifacts,
            folder = %folder.display(),
            "ignoring OCR output files from a previous run"
        );
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"%PDF-1.4").unwrap();
    }

    #[test]
    fn lists_pdfs_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.pdf");
        touch(dir.path(), "B.PDF");
        touch(dir.path(), "notes.txt");

        let files = enumerate_pdfs(dir.path()).unwrap();
        assert_eq!(files, vec!["B.PDF".to_string(), "a.pdf".to_string()]);
    }

    #[test]
    fn skips_ocr_artifacts_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "x.pdf");
        touch(dir.path(), "ocr_x.pdf");
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = enumerate_pdfs(dir.path()).unwrap();
        assert_eq!(files, vec!["x.pdf".to_string()]);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let err = enumerate_pdfs(Path::new("/no/such/folder")).unwrap_err();
        assert!(matches!(err, ScanError::ReadFolder { .. }));
    }
}
