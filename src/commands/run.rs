//! Running a job to completion on behalf of a front end.

use std::future::Future;
use std::path::PathBuf;

use tracing::info;

use crate::core::{ConversionConfig, DeletionConfig, JobController, JobKind, JobSummary};
use crate::utils::{SweepError, SweepResult};

/// Converts `files` and waits for the job; `stop_signal` resolving requests a cooperative stop.
pub async fn convert_files<S>(
    controller: &mut JobController,
    files: Vec<PathBuf>,
    config: ConversionConfig,
    stop_signal: S,
) -> SweepResult<JobSummary>
where
    S: Future<Output = ()>,
{
    controller.start_conversion(files, config)?;
    run_to_completion(controller, JobKind::Conversion, stop_signal).await
}

/// Deletes `files` and waits for the job; `stop_signal` resolving requests a cooperative stop.
pub async fn delete_files<S>(
    controller: &mut JobController,
    files: Vec<PathBuf>,
    config: DeletionConfig,
    stop_signal: S,
) -> SweepResult<JobSummary>
where
    S: Future<Output = ()>,
{
    controller.start_deletion(files, config)?;
    run_to_completion(controller, JobKind::Deletion, stop_signal).await
}

/// Waits for the running job of `kind`, stopping it first if `stop_signal` fires.
pub async fn run_to_completion<S>(
    controller: &mut JobController,
    kind: JobKind,
    stop_signal: S,
) -> SweepResult<JobSummary>
where
    S: Future<Output = ()>,
{
    let finished = tokio::select! {
        summary = controller.wait(kind) => Some(summary),
        _ = stop_signal => None,
    };

    let summary = match finished {
        Some(summary) => summary?,
        None => {
            info!("Stop requested, letting the {} job finish its current file", kind);
            controller.stop(kind).await?
        }
    };

    summary.ok_or_else(|| SweepError::runtime(format!("{kind} job produced no summary")))
}
