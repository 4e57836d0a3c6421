//! File entries produced by a scan.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils::{SweepResult, get_extension, get_file_size};

/// One scanned path plus the name parts the filter looks at.
///
/// Size is deliberately not stored: it is read from disk each time it is
/// asked for, since the file may change between scan and action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    /// File name including extension
    pub name: String,
    /// File name without its final extension
    pub stem: String,
    /// Lowercase extension without the dot; empty when there is none
    pub extension: String,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = get_extension(&path);

        Self { path, name, stem, extension }
    }

    /// Builds entries for an explicit list of paths, keeping their order.
    pub fn from_paths<I, P>(paths: I) -> Vec<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().map(Self::new).collect()
    }

    /// Current size on disk.
    pub fn size(&self) -> SweepResult<u64> {
        get_file_size(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_parts_are_derived_from_the_path() {
        let entry = FileEntry::new("/photos/IMG_001.JPG");
        assert_eq!(entry.name, "IMG_001.JPG");
        assert_eq!(entry.stem, "IMG_001");
        assert_eq!(entry.extension, "jpg");
    }

    #[test]
    fn dotfiles_have_no_extension() {
        let entry = FileEntry::new(".hidden");
        assert_eq!(entry.stem, ".hidden");
        assert_eq!(entry.extension, "");
    }

    #[test]
    fn size_is_read_fresh_every_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grow.bin");
        std::fs::write(&path, b"abc").unwrap();
        let entry = FileEntry::new(&path);
        assert_eq!(entry.size().unwrap(), 3);

        std::fs::write(&path, b"abcdef").unwrap();
        assert_eq!(entry.size().unwrap(), 6);
    }
}
