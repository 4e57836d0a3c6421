//! Building the listing a job is started from.

use std::path::PathBuf;

use tracing::debug;

use crate::core::{FileEntry, Preview};
use crate::processing::FilterSpec;
use crate::utils::{ScanMode, SweepResult, collect_files};

/// Inputs and criteria for one listing.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Files and/or directories; directories are walked recursively
    pub inputs: Vec<PathBuf>,
    pub mode: ScanMode,
    pub filter: FilterSpec,
}

/// Expands the inputs into entries without filtering them.
pub fn scan_entries(inputs: &[PathBuf], mode: ScanMode) -> SweepResult<Vec<FileEntry>> {
    let files = collect_files(inputs, mode)?;
    Ok(FileEntry::from_paths(files))
}

/// Scans and filters, returning a preview with every match selected.
pub fn preview_files(request: &ScanRequest) -> SweepResult<Preview> {
    let entries = scan_entries(&request.inputs, request.mode)?;
    let preview = Preview::build(&entries, &request.filter);
    let summary = preview.summary();
    debug!("{}/{} files match the filter", summary.matched, summary.scanned);
    Ok(preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ExtensionCategory;

    #[test]
    fn preview_combines_walk_and_filter() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["IMG_1.jpg", "IMG_2.png", "other.jpg", "IMG_3.webp"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let request = ScanRequest {
            inputs: vec![dir.path().to_path_buf()],
            mode: ScanMode::Convertible,
            filter: FilterSpec::new()
                .with_categories(&ExtensionCategory::CONVERT_DEFAULTS)
                .with_prefix("IMG_"),
        };
        let preview = preview_files(&request).unwrap();

        // the .webp never reaches the filter
        assert_eq!(preview.summary().scanned, 3);
        let names: Vec<_> = preview.rows().iter().map(|r| r.entry.name.as_str()).collect();
        assert_eq!(names, vec!["IMG_1.jpg", "IMG_2.png"]);
    }
}
