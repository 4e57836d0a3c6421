//! Lifecycle plumbing shared by the conversion and deletion jobs.
//!
//! A job owns a [`JobRunner`], which holds the state machine, the
//! cancellation token and the join handle of the worker. The worker itself
//! runs on tokio's blocking thread pool: the per-item work is plain
//! filesystem and codec calls, and items are processed strictly in order.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::core::{
    ConversionStats, DeletionStats, EventPayload, ItemFailure, JobEvent, JobKind, JobState, JobSummary, LogEntry,
    ProgressUpdate, StatsUpdate,
};
use crate::utils::{SweepError, SweepResult};

/// Sending half of a job event stream. Never blocks the worker.
pub type EventSender = UnboundedSender<JobEvent>;
pub type EventReceiver = UnboundedReceiver<JobEvent>;

/// Creates the channel a presentation layer reads job events from.
pub fn event_channel() -> (EventSender, EventReceiver) {
    unbounded_channel()
}

/// Stop flag polled by a worker between items.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(JobState::Idle as u8)))
    }

    pub(crate) fn get(&self) -> JobState {
        JobState::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, state: JobState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }

    fn transition(&self, from: JobState, to: JobState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Everything a worker loop needs: the stop flag and a tagged event sink.
pub(crate) struct JobContext {
    kind: JobKind,
    total: usize,
    cancel: CancellationToken,
    events: EventSender,
    attempted: usize,
    succeeded: usize,
    failures: Vec<ItemFailure>,
    /// Item between `begin_item` and `finish_item`
    current: Option<PathBuf>,
    last_stats: StatsUpdate,
    aborted: bool,
}

impl JobContext {
    fn new(kind: JobKind, total: usize, cancel: CancellationToken, events: EventSender) -> Self {
        Self {
            kind,
            total,
            cancel,
            events,
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
            current: None,
            last_stats: match kind {
                JobKind::Conversion => ConversionStats::default().into(),
                JobKind::Deletion => DeletionStats::default().into(),
            },
            aborted: false,
        }
    }

    pub(crate) fn should_stop(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn emit(&self, payload: EventPayload) {
        // The listener may already be gone; the job still runs to its end.
        let _ = self.events.send(JobEvent { job: self.kind, payload });
    }

    pub(crate) fn log(&self, entry: LogEntry) {
        self.emit(EventPayload::Log(entry));
    }

    pub(crate) fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub(crate) fn record_failure(&mut self, path: PathBuf, error: &SweepError) {
        let reason = error.to_string();
        self.log(LogEntry::Failed { path: path.clone(), reason: reason.clone() });
        self.failures.push(ItemFailure { path, reason });
    }

    pub(crate) fn begin_item(&mut self, path: &Path) {
        self.current = Some(path.to_path_buf());
    }

    /// Closes out one item: progress first, then the cumulative stats.
    pub(crate) fn finish_item(&mut self, stats: StatsUpdate) {
        self.current = None;
        self.last_stats = stats;
        self.attempted += 1;
        self.emit(EventPayload::Progress(ProgressUpdate::new(self.attempted, self.total)));
        self.emit(EventPayload::Stats(stats));
    }

    /// Closes out the item the worker died on and returns the last reported stats.
    fn abort(&mut self, reason: String) -> StatsUpdate {
        self.aborted = true;
        if let Some(path) = self.current.take() {
            let error = SweepError::runtime(reason);
            self.record_failure(path, &error);
            self.finish_item(self.last_stats);
        }
        self.last_stats
    }

    fn into_summary(self, stats: StatsUpdate) -> JobSummary {
        JobSummary {
            job: self.kind,
            total: self.total,
            attempted: self.attempted,
            succeeded: self.succeeded,
            stopped: self.attempted < self.total && (self.aborted || self.cancel.is_cancelled()),
            failures: self.failures,
            stats,
        }
    }
}

/// State machine and worker handle behind `start`/`stop`/`wait`.
pub(crate) struct JobRunner {
    kind: JobKind,
    state: SharedState,
    cancel: CancellationToken,
    handle: Option<JoinHandle<JobSummary>>,
    summary: Option<JobSummary>,
}

impl JobRunner {
    pub(crate) fn new(kind: JobKind) -> Self {
        Self {
            kind,
            state: SharedState::new(),
            cancel: CancellationToken::new(),
            handle: None,
            summary: None,
        }
    }

    pub(crate) fn state(&self) -> JobState {
        self.state.get()
    }

    /// Moves `Idle -> Running` and hands `work` to a blocking worker thread.
    ///
    /// `work` processes the items through the context and returns the final
    /// stats; the runner emits the terminal event and flips the state.
    pub(crate) fn spawn<F>(&mut self, total: usize, events: EventSender, work: F) -> SweepResult<()>
    where
        F: FnOnce(&mut JobContext) -> StatsUpdate + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SweepError::runtime(format!("No async runtime to run the {} job on: {e}", self.kind)))?;

        if !self.state.transition(JobState::Idle, JobState::Running) {
            return Err(SweepError::AlreadyRunning(self.kind));
        }

        info!("Starting {} job over {} files", self.kind, total);

        let kind = self.kind;
        let state = self.state.clone();
        let mut ctx = JobContext::new(kind, total, self.cancel.clone(), events);

        self.handle = Some(runtime.spawn_blocking(move || {
            let stats = match panic::catch_unwind(AssertUnwindSafe(|| work(&mut ctx))) {
                Ok(stats) => stats,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    error!("{} worker panicked: {}", kind, reason);
                    ctx.abort(format!("worker panicked: {reason}"))
                }
            };
            let events = ctx.events.clone();
            let summary = ctx.into_summary(stats);

            info!(
                "{} job finished: {}/{} succeeded, {} failed{}",
                kind,
                summary.succeeded,
                summary.total,
                summary.failures.len(),
                if summary.stopped { " (stopped)" } else { "" }
            );

            // The terminal event goes out before the state allows a successor to start.
            let _ = events.send(JobEvent {
                job: kind,
                payload: EventPayload::Finished(summary.clone()),
            });
            state.set(JobState::Finished);
            summary
        }));

        Ok(())
    }

    /// Requests a cooperative stop. The item in flight is allowed to finish.
    pub(crate) fn stop(&self) {
        if self.state.transition(JobState::Running, JobState::Stopping) {
            debug!("Stop requested for {} job", self.kind);
            self.cancel.cancel();
        }
    }

    /// Joins the worker and returns its summary; `None` if the job never started.
    ///
    /// Cancel-safe: the handle is only released once the worker has exited,
    /// so dropping this future early leaves the job joinable.
    pub(crate) async fn wait(&mut self) -> SweepResult<Option<JobSummary>> {
        if let Some(handle) = self.handle.as_mut() {
            let joined = handle.await;
            self.handle = None;
            let summary = joined.map_err(|e| {
                self.state.set(JobState::Finished);
                SweepError::runtime(format!("{} worker panicked: {e}", self.kind))
            })?;
            self.summary = Some(summary);
        }
        Ok(self.summary.clone())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
