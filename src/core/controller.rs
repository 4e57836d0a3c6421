//! Owner of the active jobs on behalf of the presentation layer.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::core::{ConversionConfig, DeletionConfig, JobKind, JobState, JobSummary};
use crate::processing::{
    ConversionJob, DeletionJob, EventSender, FileRemover, ImageCodec, SystemRemover, WebpCodec,
};
use crate::utils::{SweepError, SweepResult};

/// Holds at most one conversion and one deletion job.
///
/// Both jobs write into the controller's event sender, so the presentation
/// layer sees one ordered stream per job, tagged with the job kind. The two
/// kinds may run side by side; two jobs of the same kind may not.
pub struct JobController {
    events: EventSender,
    codec: Arc<dyn ImageCodec>,
    remover: Arc<dyn FileRemover>,
    conversion: Option<ConversionJob>,
    deletion: Option<DeletionJob>,
}

impl JobController {
    /// Creates a controller using libwebp and the system trash.
    pub fn new(events: EventSender) -> Self {
        Self::with_backends(events, Arc::new(WebpCodec), Arc::new(SystemRemover))
    }

    pub fn with_backends(
        events: EventSender,
        codec: Arc<dyn ImageCodec>,
        remover: Arc<dyn FileRemover>,
    ) -> Self {
        Self {
            events,
            codec,
            remover,
            conversion: None,
            deletion: None,
        }
    }

    pub fn conversion_state(&self) -> JobState {
        self.conversion.as_ref().map_or(JobState::Idle, ConversionJob::state)
    }

    pub fn deletion_state(&self) -> JobState {
        self.deletion.as_ref().map_or(JobState::Idle, DeletionJob::state)
    }

    /// Starts converting `files`. Rejected while a conversion is running or stopping.
    pub fn start_conversion(&mut self, files: Vec<PathBuf>, config: ConversionConfig) -> SweepResult<()> {
        if self.conversion_state().is_active() {
            return Err(SweepError::AlreadyRunning(JobKind::Conversion));
        }

        debug!("Conversion requested for {} files at quality {}", files.len(), config.effective_quality());
        let mut job = ConversionJob::with_codec(files, config, Arc::clone(&self.codec));
        job.start(self.events.clone())?;
        self.conversion = Some(job);
        Ok(())
    }

    /// Starts deleting `files`. Rejected while a deletion is running or stopping.
    pub fn start_deletion(&mut self, files: Vec<PathBuf>, config: DeletionConfig) -> SweepResult<()> {
        if self.deletion_state().is_active() {
            return Err(SweepError::AlreadyRunning(JobKind::Deletion));
        }

        debug!("Deletion requested for {} files (trash: {})", files.len(), config.use_trash);
        let mut job = DeletionJob::with_remover(files, config, Arc::clone(&self.remover));
        job.start(self.events.clone())?;
        self.deletion = Some(job);
        Ok(())
    }

    /// Stops the conversion and waits until its worker has exited.
    pub async fn stop_conversion(&mut self) -> SweepResult<Option<JobSummary>> {
        match self.conversion.as_mut() {
            Some(job) => {
                job.stop();
                job.wait().await
            }
            None => Ok(None),
        }
    }

    /// Stops the deletion and waits until its worker has exited.
    pub async fn stop_deletion(&mut self) -> SweepResult<Option<JobSummary>> {
        match self.deletion.as_mut() {
            Some(job) => {
                job.stop();
                job.wait().await
            }
            None => Ok(None),
        }
    }

    /// Waits for the conversion to run out of files.
    pub async fn wait_conversion(&mut self) -> SweepResult<Option<JobSummary>> {
        match self.conversion.as_mut() {
            Some(job) => job.wait().await,
            None => Ok(None),
        }
    }

    /// Waits for the deletion to run out of files.
    pub async fn wait_deletion(&mut self) -> SweepResult<Option<JobSummary>> {
        match self.deletion.as_mut() {
            Some(job) => job.wait().await,
            None => Ok(None),
        }
    }

    pub fn state(&self, kind: JobKind) -> JobState {
        match kind {
            JobKind::Conversion => self.conversion_state(),
            JobKind::Deletion => self.deletion_state(),
        }
    }

    pub async fn stop(&mut self, kind: JobKind) -> SweepResult<Option<JobSummary>> {
        match kind {
            JobKind::Conversion => self.stop_conversion().await,
            JobKind::Deletion => self.stop_deletion().await,
        }
    }

    pub async fn wait(&mut self, kind: JobKind) -> SweepResult<Option<JobSummary>> {
        match kind {
            JobKind::Conversion => self.wait_conversion().await,
            JobKind::Deletion => self.wait_deletion().await,
        }
    }

    /// Stops and joins every job, e.g. before the application exits.
    pub async fn shutdown(&mut self) -> SweepResult<()> {
        self.stop_conversion().await?;
        self.stop_deletion().await?;
        Ok(())
    }
}
