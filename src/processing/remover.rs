//! File removal boundary: recoverable trash or permanent delete.

use std::path::Path;

use crate::utils::{SweepError, SweepResult};

/// The two ways a deletion job can get rid of a file.
pub trait FileRemover: Send + Sync {
    /// Moves `path` to the platform's recoverable trash.
    fn move_to_trash(&self, path: &Path) -> SweepResult<()>;

    /// Removes `path` for good.
    fn remove_permanently(&self, path: &Path) -> SweepResult<()>;
}

/// Uses the OS trash through the `trash` crate and `std::fs` for permanent removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRemover;

impl FileRemover for SystemRemover {
    fn move_to_trash(&self, path: &Path) -> SweepResult<()> {
        trash::delete(path).map_err(|e| SweepError::trash(format!("{}: {}", path.display(), e)))
    }

    fn remove_permanently(&self, path: &Path) -> SweepResult<()> {
        std::fs::remove_file(path).map_err(Into::into)
    }
}
