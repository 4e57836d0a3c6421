use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use webp_sweeper_lib::core::{DEFAULT_QUALITY, JobSummary, Preview};
use webp_sweeper_lib::processing::EventReceiver;
use webp_sweeper_lib::utils::{ExtensionCategory, ScanMode, format_size};
use webp_sweeper_lib::{
    ConversionConfig, DeletionConfig, FilterSpec, JobController, ScanRequest, convert_files, delete_files,
    event_channel, preview_files, render_event,
};

#[derive(Parser)]
#[command(name = "webp-sweeper", version, about = "Batch WebP conversion and filtered file cleanup")]
struct Cli {
    /// Print events and listings as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the files a filter selects without touching them
    Scan {
        #[command(flatten)]
        selection: Selection,
        /// Walk every file instead of convertible images only
        #[arg(long)]
        all: bool,
    },
    /// Convert the selected images to WebP
    Convert {
        #[command(flatten)]
        selection: Selection,
        /// Encoder quality, 1-100
        #[arg(short, long, default_value_t = DEFAULT_QUALITY)]
        quality: u32,
        /// Keep the source image next to the new .webp
        #[arg(long)]
        keep_original: bool,
    },
    /// Move the selected files to the trash
    Delete {
        #[command(flatten)]
        selection: Selection,
        /// Remove files permanently instead of trashing them
        #[arg(long)]
        permanent: bool,
        /// Actually delete; without it only the listing is printed
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct Selection {
    /// Files or directories; directories are walked recursively
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Allowed extensions or categories (jpeg, png, bmp, tiff, gif, webp), comma separated
    #[arg(short, long, value_delimiter = ',')]
    ext: Vec<String>,
    /// Required start of the file name (without extension)
    #[arg(long, default_value = "")]
    prefix: String,
    /// Required end of the file name (without extension)
    #[arg(long, default_value = "")]
    suffix: String,
    /// Treat prefix and suffix as regular expressions
    #[arg(long)]
    regex: bool,
}

impl Selection {
    fn request(&self, mode: ScanMode, defaults: &[ExtensionCategory]) -> ScanRequest {
        let mut filter = FilterSpec::new()
            .with_prefix(&self.prefix)
            .with_suffix(&self.suffix)
            .with_patterns(self.regex);

        if self.ext.is_empty() {
            filter = filter.with_categories(defaults);
        }
        for token in &self.ext {
            filter = match ExtensionCategory::from_str(token) {
                Ok(category) => filter.with_categories(&[category]),
                Err(_) => filter.with_extensions([token]),
            };
        }

        ScanRequest { inputs: self.inputs.clone(), mode, filter }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    debug!("=== webp-sweeper starting ===");

    match cli.command {
        Command::Scan { selection, all } => {
            let (mode, defaults): (_, &[ExtensionCategory]) = if all {
                (ScanMode::All, &[])
            } else {
                (ScanMode::Convertible, &ExtensionCategory::CONVERT_DEFAULTS)
            };
            let preview = preview_files(&selection.request(mode, defaults))?;
            print_preview(&preview, cli.json)?;
        }
        Command::Convert { selection, quality, keep_original } => {
            let preview = preview_files(&selection.request(ScanMode::Convertible, &ExtensionCategory::CONVERT_DEFAULTS))?;
            let files = preview.selected_paths();
            if files.is_empty() {
                info!("Nothing to convert");
                return Ok(());
            }

            let (events, receiver) = event_channel();
            let printer = tokio::spawn(print_events(receiver, cli.json));
            let mut controller = JobController::new(events);

            let summary = convert_files(
                &mut controller,
                files,
                ConversionConfig::new(quality, keep_original),
                stop_signal(),
            )
            .await;
            drop(controller);
            printer.await.context("event printer stopped unexpectedly")?;
            report(summary?)?;
        }
        Command::Delete { selection, permanent, yes } => {
            if selection.ext.is_empty() {
                bail!("delete needs at least one --ext so it never sweeps a whole tree by accident");
            }
            let preview = preview_files(&selection.request(ScanMode::All, &[]))?;
            if !yes {
                print_preview(&preview, cli.json)?;
                if !cli.json {
                    println!("Dry run; pass --yes to delete these files.");
                }
                return Ok(());
            }

            let files = preview.selected_paths();
            if files.is_empty() {
                info!("Nothing to delete");
                return Ok(());
            }

            let (events, receiver) = event_channel();
            let printer = tokio::spawn(print_events(receiver, cli.json));
            let mut controller = JobController::new(events);

            let summary = delete_files(
                &mut controller,
                files,
                DeletionConfig { use_trash: !permanent },
                stop_signal(),
            )
            .await;
            drop(controller);
            printer.await.context("event printer stopped unexpectedly")?;
            report(summary?)?;
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the job simply runs to its end.
async fn stop_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, stopping after the current file"),
        Err(e) => {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

async fn print_events(mut receiver: EventReceiver, json: bool) {
    while let Some(event) = receiver.recv().await {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Failed to serialize event: {}", e),
            }
        } else {
            for line in render_event(&event) {
                println!("{line}");
            }
        }
    }
}

fn print_preview(preview: &Preview, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(preview)?);
        return Ok(());
    }

    for row in preview.rows() {
        println!("{:>10}  {:<5} {}", row.size_label(), row.extension_label(), row.entry.path.display());
    }
    let summary = preview.summary();
    println!(
        "{} of {} files selected, {}",
        summary.matched,
        summary.scanned,
        format_size(preview.selected_total_size())
    );
    Ok(())
}

fn report(summary: JobSummary) -> anyhow::Result<()> {
    if !summary.failures.is_empty() {
        for failure in &summary.failures {
            warn!("{}: {}", failure.path.display(), failure.reason);
        }
        bail!("{} of {} files failed", summary.failures.len(), summary.total);
    }
    Ok(())
}
