//! Core types and the job controller.
//!
//! - [`JobController`]: owns the active conversion and deletion jobs
//! - [`FileEntry`]: a scanned path with its derived name parts
//! - [`Preview`]: filtered listing with per-row inclusion toggles
//! - [`JobEvent`]: what a running job reports upward
//! - [`ConversionConfig`] / [`DeletionConfig`]: settings captured at job start

mod controller;
mod entry;
mod preview;
mod progress;
mod types;

pub use controller::JobController;
pub use entry::FileEntry;
pub use preview::{Preview, PreviewRow};
pub use progress::{EventPayload, ItemFailure, JobEvent, JobSummary, LogEntry, ProgressUpdate, StatsUpdate};
pub use types::{
    ConversionConfig, ConversionStats, DEFAULT_QUALITY, DeletionConfig, DeletionStats, JobKind, JobState,
    MAX_QUALITY, MIN_QUALITY,
};
