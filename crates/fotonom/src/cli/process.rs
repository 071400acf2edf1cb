//! The `fotonom process` command: analyze photos and compute their names.

use clap::Args;
use fotonom_core::{
    AnalysisRequest, Config, MemoryCounterStore, Pipeline, ProgressEvent, RateLimiter,
    SequenceCounter, TaskQueue, VisionClient,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use walkdir::WalkDir;

/// Image extensions the scanner picks up.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Image file or directory to process
    #[arg(required = true)]
    pub input: PathBuf,

    /// Max photos processed concurrently (overrides config)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Place name hint passed to providers (normally from reverse geocoding)
    #[arg(long)]
    pub place: Option<String>,

    /// Rename the files on disk to their computed names
    #[arg(long)]
    pub rename: bool,

    /// Print results as JSON lines instead of a summary table
    #[arg(long)]
    pub json: bool,
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(parallel) = args.parallel {
        config.queue.max_parallel = parallel.max(1);
    }

    let files = discover_files(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No images found at: {}", args.input.display());
    }
    tracing::info!("Found {} image(s) to process", files.len());

    let pipeline = build_pipeline(&config);

    // Read the batch up front; unreadable files are reported and skipped,
    // they never abort the batch.
    let mut requests = Vec::new();
    let mut failed: u64 = 0;
    for path in &files {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                requests.push(AnalysisRequest::new(bytes, file_name, args.place.clone()))
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Failed to read {}: {e}", path.display());
            }
        }
    }

    let progress = create_progress_bar(requests.len() as u64);
    let mut rx = pipeline.process_batch(requests);

    let mut records = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            ProgressEvent::Started { file_name } => {
                progress.set_message(file_name);
            }
            ProgressEvent::Finished(record) => {
                progress.inc(1);
                if args.json {
                    println!("{}", serde_json::to_string(&record)?);
                }
                records.push(record);
            }
            ProgressEvent::Failed { file_name, error } => {
                progress.inc(1);
                failed += 1;
                tracing::error!("Failed: {file_name} - {error}");
            }
        }
    }
    progress.finish_and_clear();

    if !args.json {
        for record in &records {
            println!("{}  ->  {}", record.original_name, record.final_name);
        }
    }

    if args.rename {
        rename_files(&args.input, &files, &records)?;
    }

    tracing::info!("Done: {} completed, {failed} failed", records.len());
    Ok(())
}

/// Wire the pipeline services from config.
fn build_pipeline(config: &Config) -> Arc<Pipeline> {
    let vision = VisionClient::from_config(config);
    if vision.provider_count() == 0 {
        tracing::warn!(
            "no vision provider configured — photos will get deterministic fallback names"
        );
    }
    Arc::new(Pipeline::new(
        Arc::new(TaskQueue::new(config.queue.max_parallel)),
        Arc::new(RateLimiter::new(
            config.limiter.max_requests,
            Duration::from_millis(config.limiter.window_ms),
        )),
        Arc::new(vision),
        Arc::new(SequenceCounter::new(Arc::new(MemoryCounterStore::new()))),
    ))
}

/// Collect image files from a path (single file or recursive directory walk).
fn discover_files(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Rename processed files in place, keyed by original name.
fn rename_files(
    input: &Path,
    files: &[PathBuf],
    records: &[fotonom_core::PhotoRecord],
) -> anyhow::Result<()> {
    for record in records {
        let Some(path) = files.iter().find(|p| {
            p.file_name()
                .map(|name| name.to_string_lossy() == record.original_name)
                .unwrap_or(false)
        }) else {
            continue;
        };
        let target = path
            .parent()
            .unwrap_or(input)
            .join(&record.final_name);
        std::fs::rename(path, &target)?;
        tracing::info!("Renamed {} -> {}", path.display(), target.display());
    }
    Ok(())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    progress
}
