use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::utils::formats::{is_convertible, normalize_extension, TARGET_EXTENSION};
use crate::utils::{SweepError, SweepResult, ValidationError};

/// Which files a directory walk keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Decodable source images, skipping anything already converted.
    Convertible,
    /// Every regular file.
    All,
}

impl ScanMode {
    fn accepts(&self, path: &Path) -> bool {
        match self {
            Self::All => true,
            Self::Convertible => {
                let ext = get_extension(path);
                ext != TARGET_EXTENSION && is_convertible(&ext)
            }
        }
    }
}

/// Get file size in bytes
pub fn get_file_size(path: impl AsRef<Path>) -> SweepResult<u64> {
    std::fs::metadata(path.as_ref())
        .map(|m| m.len())
        .map_err(|e| SweepError::IO(format!(
            "Failed to get file size of {}: {}", path.as_ref().display(), e
        )))
}

/// Get file extension as a lowercase string without the dot; empty when there is none.
pub fn get_extension(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(normalize_extension)
        .unwrap_or_default()
}

/// Returns the sibling path the converted output of `input` is written to.
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension(TARGET_EXTENSION)
}

/// Walks `root` recursively and returns the files `mode` accepts, sorted by path.
///
/// Unreadable subdirectories are skipped with a warning rather than failing the scan.
pub fn scan_directory(root: &Path, mode: ScanMode) -> SweepResult<Vec<PathBuf>> {
    if !root.exists() {
        return Err(ValidationError::path_not_found(root).into());
    }
    if !root.is_dir() {
        return Err(ValidationError::unsupported_path(root).into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && mode.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Scanned {} -> {} files ({:?})", root.display(), files.len(), mode);
    Ok(files)
}

/// Expands a mixed list of files and directories into a flat file list.
///
/// Explicit files are kept as given, whatever their extension; directories
/// are walked with `mode`.
pub fn collect_files(inputs: &[PathBuf], mode: ScanMode) -> SweepResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(scan_directory(input, mode)?);
        } else if input.is_file() {
            files.push(input.clone());
        } else if input.exists() {
            return Err(ValidationError::unsupported_path(input).into());
        } else {
            return Err(ValidationError::path_not_found(input).into());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn output_path_replaces_extension_in_place() {
        assert_eq!(
            output_path_for(Path::new("/photos/IMG_001.JPG")),
            PathBuf::from("/photos/IMG_001.webp")
        );
        assert_eq!(
            output_path_for(Path::new("archive.tar.png")),
            PathBuf::from("archive.tar.webp")
        );
    }

    #[test]
    fn convertible_walk_skips_converted_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("a.webp"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("nested/b.TIFF"));

        let found = scan_directory(dir.path(), ScanMode::Convertible).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.TIFF"]);
    }

    #[test]
    fn full_walk_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.webp"));
        touch(&dir.path().join("notes.txt"));

        let found = scan_directory(dir.path(), ScanMode::All).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn missing_input_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = collect_files(&[missing], ScanMode::All).unwrap_err();
        assert!(matches!(err, SweepError::Validation(_)));
    }

    #[test]
    fn explicit_files_bypass_the_mode() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        touch(&txt);
        let files = collect_files(&[txt.clone()], ScanMode::Convertible).unwrap();
        assert_eq!(files, vec![txt]);
    }
}
