//! Events a running job emits to whoever presents it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{ConversionStats, DeletionStats, JobKind};
use crate::utils::format_size;

/// One message on a job's event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEvent {
    /// Job that produced the event
    pub job: JobKind,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum EventPayload {
    Progress(ProgressUpdate),
    Log(LogEntry),
    Stats(StatsUpdate),
    Finished(JobSummary),
}

/// Progress after an item, successful or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Items attempted so far, including failures
    pub completed_tasks: usize,
    /// Items in the job's snapshot
    pub total_tasks: usize,
    /// Progress percentage (0-100)
    pub progress_percentage: usize,
}

impl ProgressUpdate {
    pub fn new(completed_tasks: usize, total_tasks: usize) -> Self {
        let progress_percentage = if total_tasks > 0 {
            (completed_tasks * 100) / total_tasks
        } else {
            0
        };

        Self {
            completed_tasks,
            total_tasks,
            progress_percentage,
        }
    }
}

/// Cumulative totals; what the two numbers mean depends on the job kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StatsUpdate {
    #[serde(rename_all = "camelCase")]
    Conversion { original_bytes: u64, converted_bytes: u64 },
    #[serde(rename_all = "camelCase")]
    Deletion { removed: usize, freed_bytes: u64 },
}

impl From<ConversionStats> for StatsUpdate {
    fn from(stats: ConversionStats) -> Self {
        Self::Conversion {
            original_bytes: stats.original_bytes,
            converted_bytes: stats.converted_bytes,
        }
    }
}

impl From<DeletionStats> for StatsUpdate {
    fn from(stats: DeletionStats) -> Self {
        Self::Deletion {
            removed: stats.removed,
            freed_bytes: stats.freed_bytes,
        }
    }
}

/// Typed outcome of one step on one file. `Display` renders the log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum LogEntry {
    #[serde(rename_all = "camelCase")]
    Converted {
        source: PathBuf,
        output: PathBuf,
        original_size: u64,
        converted_size: u64,
        reduction_percent: f64,
    },
    SourceRemoved { path: PathBuf },
    SourceRemovalFailed { path: PathBuf, reason: String },
    #[serde(rename_all = "camelCase")]
    Trashed { path: PathBuf, size: u64 },
    #[serde(rename_all = "camelCase")]
    Deleted { path: PathBuf, size: u64 },
    Failed { path: PathBuf, reason: String },
}

impl LogEntry {
    /// True for entries that describe a problem.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::SourceRemovalFailed { .. })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converted { source, output, original_size, converted_size, reduction_percent } => write!(
                f,
                "✓ {} → {} | original: {} | webp: {} | saved: {:.1}%",
                file_name(source),
                file_name(output),
                format_size(*original_size),
                format_size(*converted_size),
                reduction_percent
            ),
            Self::SourceRemoved { path } => write!(f, "✗ removed original: {}", file_name(path)),
            Self::SourceRemovalFailed { path, reason } => {
                write!(f, "❌ could not remove original {}: {}", path.display(), reason)
            }
            Self::Trashed { path, .. } => write!(f, "🗑️ moved to trash: {}", file_name(path)),
            Self::Deleted { path, .. } => write!(f, "✗ permanently deleted: {}", file_name(path)),
            Self::Failed { path, reason } => write!(f, "❌ failed on {}: {}", path.display(), reason),
        }
    }
}

/// A file the job gave up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Final report, carried by the terminal `Finished` event and returned when a job is joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub job: JobKind,
    /// Files in the snapshot
    pub total: usize,
    /// Files the loop reached before exhausting the list or observing a stop
    pub attempted: usize,
    /// Files fully processed
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
    /// The loop exited because of a stop request
    pub stopped: bool,
    pub stats: StatsUpdate,
}

impl JobSummary {
    pub fn is_complete(&self) -> bool {
        !self.stopped && self.attempted == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percentage_handles_empty_jobs() {
        assert_eq!(ProgressUpdate::new(0, 0).progress_percentage, 0);
        assert_eq!(ProgressUpdate::new(1, 3).progress_percentage, 33);
        assert_eq!(ProgressUpdate::new(3, 3).progress_percentage, 100);
    }

    #[test]
    fn converted_line_mentions_both_names_and_reduction() {
        let entry = LogEntry::Converted {
            source: PathBuf::from("/p/IMG_001.jpg"),
            output: PathBuf::from("/p/IMG_001.webp"),
            original_size: 2048,
            converted_size: 1024,
            reduction_percent: 50.0,
        };
        let line = entry.to_string();
        assert!(line.contains("IMG_001.jpg → IMG_001.webp"));
        assert!(line.contains("2.0 KB"));
        assert!(line.contains("50.0%"));
        assert!(!entry.is_error());
    }

    #[test]
    fn trash_and_permanent_lines_differ() {
        let trashed = LogEntry::Trashed { path: PathBuf::from("a.tmp"), size: 1 }.to_string();
        let deleted = LogEntry::Deleted { path: PathBuf::from("a.tmp"), size: 1 }.to_string();
        assert!(trashed.contains("trash"));
        assert!(deleted.contains("permanently"));
    }

    #[test]
    fn events_serialize_with_tagged_payloads() {
        let event = JobEvent {
            job: JobKind::Deletion,
            payload: EventPayload::Stats(DeletionStats { removed: 2, freed_bytes: 10 }.into()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["job"], "deletion");
        assert_eq!(json["payload"]["type"], "stats");
        assert_eq!(json["payload"]["data"]["freedBytes"], 10);
    }
}
