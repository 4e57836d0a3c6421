//! Batch conversion of raster images to WebP.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::core::{ConversionConfig, ConversionStats, JobKind, JobState, JobSummary, LogEntry};
use crate::processing::codec::{ImageCodec, WebpCodec, flatten};
use crate::processing::job::{EventSender, JobContext, JobRunner};
use crate::utils::{
    SweepResult, TARGET_EXTENSION, ValidationError, get_extension, get_file_size, output_path_for, reduction_percent,
};

/// Converts a fixed snapshot of files, one at a time, on a background thread.
pub struct ConversionJob {
    files: Arc<Vec<PathBuf>>,
    config: ConversionConfig,
    codec: Arc<dyn ImageCodec>,
    stats: Arc<Mutex<ConversionStats>>,
    runner: JobRunner,
}

/// What one successful conversion produced.
struct Converted {
    output: PathBuf,
    original_size: u64,
    converted_size: u64,
}

impl ConversionJob {
    pub fn new(files: Vec<PathBuf>, config: ConversionConfig) -> Self {
        Self::with_codec(files, config, Arc::new(WebpCodec))
    }

    pub fn with_codec(files: Vec<PathBuf>, config: ConversionConfig, codec: Arc<dyn ImageCodec>) -> Self {
        Self {
            files: Arc::new(files),
            config,
            codec,
            stats: Arc::new(Mutex::new(ConversionStats::default())),
            runner: JobRunner::new(JobKind::Conversion),
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn state(&self) -> JobState {
        self.runner.state()
    }

    /// Latest running totals.
    pub fn stats(&self) -> ConversionStats {
        self.stats.lock().map(|s| *s).unwrap_or_default()
    }

    /// Starts the worker; events go to `events`. Fails if this job was started before.
    pub fn start(&mut self, events: EventSender) -> SweepResult<()> {
        let files = Arc::clone(&self.files);
        let config = self.config.clone();
        let codec = Arc::clone(&self.codec);
        let stats = Arc::clone(&self.stats);

        self.runner.spawn(files.len(), events, move |ctx| {
            run_conversion(&files, &config, codec.as_ref(), &stats, ctx).into()
        })
    }

    /// Asks the worker to stop before its next file.
    pub fn stop(&self) {
        self.runner.stop();
    }

    /// Waits for the worker to exit and returns its summary.
    pub async fn wait(&mut self) -> SweepResult<Option<JobSummary>> {
        self.runner.wait().await
    }
}

fn run_conversion(
    files: &[PathBuf],
    config: &ConversionConfig,
    codec: &dyn ImageCodec,
    stats: &Mutex<ConversionStats>,
    ctx: &mut JobContext,
) -> ConversionStats {
    let quality = config.effective_quality();
    let mut totals = ConversionStats::default();
    // Outputs written by this run; a later source mapping onto one of them is refused.
    let mut written: HashSet<PathBuf> = HashSet::new();

    for input in files {
        if ctx.should_stop() {
            debug!("Conversion stop observed before {}", input.display());
            break;
        }
        ctx.begin_item(input);

        match convert_single(codec, input, quality, &written) {
            Ok(converted) => {
                written.insert(converted.output.clone());
                totals.record(converted.original_size, converted.converted_size);
                ctx.record_success();
                ctx.log(LogEntry::Converted {
                    source: input.clone(),
                    output: converted.output.clone(),
                    original_size: converted.original_size,
                    converted_size: converted.converted_size,
                    reduction_percent: reduction_percent(converted.original_size, converted.converted_size),
                });

                if !config.keep_original {
                    ctx.log(remove_source(input, &converted.output));
                }
            }
            Err(e) => {
                warn!("Conversion failed for {}: {}", input.display(), e);
                ctx.record_failure(input.clone(), &e);
            }
        }

        if let Ok(mut shared) = stats.lock() {
            *shared = totals;
        }
        ctx.finish_item(totals.into());
    }

    totals
}

/// Converts one file next to itself. Runs on the worker thread.
fn convert_single(
    codec: &dyn ImageCodec,
    input: &Path,
    quality: u32,
    written: &HashSet<PathBuf>,
) -> SweepResult<Converted> {
    let output = output_path_for(input);
    if output == input || get_extension(input) == TARGET_EXTENSION {
        return Err(ValidationError::output_conflict(input).into());
    }
    if written.contains(&output) {
        return Err(ValidationError::output_conflict(&output).into());
    }

    let original_size = get_file_size(input)?;

    let image = flatten(codec.decode(input)?);
    codec.encode(&image, quality, &output)?;

    let converted_size = get_file_size(&output)?;
    debug!(
        "'{}' → {} bytes ({:.1}% smaller)",
        input.display(),
        converted_size,
        reduction_percent(original_size, converted_size)
    );

    Ok(Converted { output, original_size, converted_size })
}

/// Deletes the source once a distinct output is on disk. Failure here does not undo the conversion.
fn remove_source(input: &Path, output: &Path) -> LogEntry {
    let refuse = |reason: String| LogEntry::SourceRemovalFailed {
        path: input.to_path_buf(),
        reason,
    };

    if output == input {
        return refuse("output is the source itself".to_string());
    }
    if !output.is_file() {
        return refuse(format!("output {} is missing", output.display()));
    }

    match std::fs::remove_file(input) {
        Ok(()) => LogEntry::SourceRemoved { path: input.to_path_buf() },
        Err(e) => {
            warn!("Could not remove {}: {}", input.display(), e);
            refuse(e.to_string())
        }
    }
}
