//! Turns job events into the lines a terminal front end prints.

use crate::core::{EventPayload, JobEvent, JobKind, JobSummary, StatsUpdate};
use crate::utils::{format_signed_size, format_size, reduction_percent};

/// Human-readable lines for `event`. Progress renders as a single status line.
pub fn render_event(event: &JobEvent) -> Vec<String> {
    match &event.payload {
        EventPayload::Progress(p) => vec![format!(
            "[{}] {}/{} ({}%)",
            event.job, p.completed_tasks, p.total_tasks, p.progress_percentage
        )],
        EventPayload::Log(entry) => vec![entry.to_string()],
        EventPayload::Stats(stats) => vec![render_stats(stats)],
        EventPayload::Finished(summary) => render_summary(summary),
    }
}

pub fn render_stats(stats: &StatsUpdate) -> String {
    match *stats {
        StatsUpdate::Conversion { original_bytes, converted_bytes } => format!(
            "original: {} | webp: {} | saved: {} ({:.1}%)",
            format_size(original_bytes),
            format_size(converted_bytes),
            saved_label(original_bytes, converted_bytes),
            reduction_percent(original_bytes, converted_bytes)
        ),
        StatsUpdate::Deletion { removed, freed_bytes } => {
            format!("removed: {} files | freed: {}", removed, format_size(freed_bytes))
        }
    }
}

pub fn render_summary(summary: &JobSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.stopped {
        lines.push(format!("⚠️ {} stopped", summary.job));
    }

    let noun = match summary.job {
        JobKind::Conversion => "images",
        JobKind::Deletion => "files",
    };
    lines.push(format!("🎉 Done! Processed {}/{} {}", summary.succeeded, summary.total, noun));

    if !summary.failures.is_empty() {
        lines.push(format!("{} failed", summary.failures.len()));
    }

    match summary.stats {
        StatsUpdate::Conversion { original_bytes, converted_bytes } if original_bytes > 0 => {
            lines.push(format!(
                "📊 Saved {} ({:.1}%)",
                saved_label(original_bytes, converted_bytes),
                reduction_percent(original_bytes, converted_bytes)
            ));
        }
        StatsUpdate::Deletion { freed_bytes, .. } => {
            lines.push(format!("📊 Freed {}", format_size(freed_bytes)));
        }
        _ => {}
    }
    lines
}

/// Bytes saved, signed: growth renders as a negative size.
fn saved_label(original_bytes: u64, converted_bytes: u64) -> String {
    format_signed_size(original_bytes as i64 - converted_bytes as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ItemFailure, ProgressUpdate};
    use std::path::PathBuf;

    #[test]
    fn progress_line_names_the_job() {
        let event = JobEvent {
            job: JobKind::Deletion,
            payload: EventPayload::Progress(ProgressUpdate::new(1, 4)),
        };
        assert_eq!(render_event(&event), vec!["[deletion] 1/4 (25%)"]);
    }

    #[test]
    fn conversion_stats_show_savings() {
        let line = render_stats(&StatsUpdate::Conversion { original_bytes: 2048, converted_bytes: 1024 });
        assert_eq!(line, "original: 2.0 KB | webp: 1.0 KB | saved: 1.0 KB (50.0%)");
    }

    #[test]
    fn growth_renders_as_negative_savings() {
        let line = render_stats(&StatsUpdate::Conversion { original_bytes: 1024, converted_bytes: 2048 });
        assert_eq!(line, "original: 1.0 KB | webp: 2.0 KB | saved: -1.0 KB (-100.0%)");
    }

    #[test]
    fn stopped_summary_leads_with_a_notice() {
        let summary = JobSummary {
            job: JobKind::Conversion,
            total: 3,
            attempted: 1,
            succeeded: 0,
            failures: vec![ItemFailure { path: PathBuf::from("x.png"), reason: "bad".into() }],
            stopped: true,
            stats: StatsUpdate::Conversion { original_bytes: 0, converted_bytes: 0 },
        };
        let lines = render_summary(&summary);
        assert_eq!(lines[0], "⚠️ conversion stopped");
        assert_eq!(lines[1], "🎉 Done! Processed 0/3 images");
        assert_eq!(lines[2], "1 failed");
        assert_eq!(lines.len(), 3);
    }
}
