//! Batch removal of files, to the trash or for good.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::core::{DeletionConfig, DeletionStats, JobKind, JobState, JobSummary, LogEntry};
use crate::processing::job::{EventSender, JobContext, JobRunner};
use crate::processing::remover::{FileRemover, SystemRemover};
use crate::utils::{SweepResult, get_file_size};

/// Removes a fixed snapshot of files, one at a time, on a background thread.
pub struct DeletionJob {
    files: Arc<Vec<PathBuf>>,
    config: DeletionConfig,
    remover: Arc<dyn FileRemover>,
    stats: Arc<Mutex<DeletionStats>>,
    runner: JobRunner,
}

impl DeletionJob {
    pub fn new(files: Vec<PathBuf>, config: DeletionConfig) -> Self {
        Self::with_remover(files, config, Arc::new(SystemRemover))
    }

    pub fn with_remover(files: Vec<PathBuf>, config: DeletionConfig, remover: Arc<dyn FileRemover>) -> Self {
        Self {
            files: Arc::new(files),
            config,
            remover,
            stats: Arc::new(Mutex::new(DeletionStats::default())),
            runner: JobRunner::new(JobKind::Deletion),
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn state(&self) -> JobState {
        self.runner.state()
    }

    pub fn stats(&self) -> DeletionStats {
        self.stats.lock().map(|s| *s).unwrap_or_default()
    }

    pub fn start(&mut self, events: EventSender) -> SweepResult<()> {
        let files = Arc::clone(&self.files);
        let use_trash = self.config.use_trash;
        let remover = Arc::clone(&self.remover);
        let stats = Arc::clone(&self.stats);

        self.runner.spawn(files.len(), events, move |ctx| {
            run_deletion(&files, use_trash, remover.as_ref(), &stats, ctx).into()
        })
    }

    pub fn stop(&self) {
        self.runner.stop();
    }

    pub async fn wait(&mut self) -> SweepResult<Option<JobSummary>> {
        self.runner.wait().await
    }
}

fn run_deletion(
    files: &[PathBuf],
    use_trash: bool,
    remover: &dyn FileRemover,
    stats: &Mutex<DeletionStats>,
    ctx: &mut JobContext,
) -> DeletionStats {
    let mut totals = DeletionStats::default();

    for path in files {
        if ctx.should_stop() {
            debug!("Deletion stop observed before {}", path.display());
            break;
        }
        ctx.begin_item(path);

        match delete_single(remover, path, use_trash) {
            Ok(entry) => {
                let size = match &entry {
                    LogEntry::Trashed { size, .. } | LogEntry::Deleted { size, .. } => *size,
                    _ => 0,
                };
                totals.record(size);
                ctx.record_success();
                ctx.log(entry);
            }
            Err(e) => {
                warn!("Deletion failed for {}: {}", path.display(), e);
                ctx.record_failure(path.clone(), &e);
            }
        }

        if let Ok(mut shared) = stats.lock() {
            *shared = totals;
        }
        ctx.finish_item(totals.into());
    }

    totals
}

fn delete_single(remover: &dyn FileRemover, path: &Path, use_trash: bool) -> SweepResult<LogEntry> {
    let size = get_file_size(path)?;

    if use_trash {
        remover.move_to_trash(path)?;
        Ok(LogEntry::Trashed { path: path.to_path_buf(), size })
    } else {
        remover.remove_permanently(path)?;
        Ok(LogEntry::Deleted { path: path.to_path_buf(), size })
    }
}
