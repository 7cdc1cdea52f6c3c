use anyhow::{Context, Result};
use clap::Parser;
use pixel_squeeze::batch::{collect_input_files, BatchState};
use pixel_squeeze::cli::{Args, Commands};
use pixel_squeeze::constants::{
    DEFAULT_ARCHIVE_NAME, INFO_PREFIX, OPTIMIZED_SIZE_PREFIX, ORIGINAL_SIZE_PREFIX,
    REDUCTION_PREFIX, SUCCESS_PREFIX,
};
use pixel_squeeze::export::{write_archive, write_exports};
use pixel_squeeze::info::{inspect_file, print_file_info};
use pixel_squeeze::logger::{self, is_quiet};
use pixel_squeeze::processing::ReductionOptions;
use pixel_squeeze::progress::{NoopObserver, ProgressBarObserver};
use pixel_squeeze::session::SessionController;
use pixel_squeeze::source::SourceFile;
use pixel_squeeze::utils::{create_progress_spinner, format_file_size};
use pixel_squeeze::{info, verbose, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    let threads = match &args.command {
        Commands::Batch { threads, .. } => *threads,
        _ => None,
    };
    let runtime = build_runtime(threads)?;

    runtime.block_on(run(args.command))
}

fn build_runtime(threads: Option<usize>) -> Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if let Some(num_threads) = threads.filter(|n| *n > 0) {
        builder.worker_threads(num_threads);
        builder.max_blocking_threads(num_threads);
    }

    builder.build().context("Failed to start async runtime")
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Batch {
            input,
            output,
            recursive,
            archive,
            max_width,
            max_height,
            threads: _,
        } => {
            let options = ReductionOptions::new(max_width, max_height)?;
            run_batch(&input, &output, recursive, archive, &options).await
        }
        Commands::Compress {
            input,
            output,
            max_width,
            max_height,
        } => {
            let options = ReductionOptions::new(max_width, max_height)?;
            run_compress(&input, &output, &options).await
        }
        Commands::Info {
            input,
            max_width,
            max_height,
        } => {
            let options = ReductionOptions::new(max_width, max_height)?;
            info!("{} Getting info for: {:?}", INFO_PREFIX, input);
            let report = inspect_file(&input, options.bounds)
                .with_context(|| format!("Failed to inspect {}", input.display()))?;
            print_file_info(&report);
            Ok(())
        }
    }
}

async fn run_batch(
    input: &str,
    output: &Path,
    recursive: bool,
    archive: bool,
    options: &ReductionOptions,
) -> Result<()> {
    let started = Instant::now();

    let paths = collect_input_files(input, recursive)
        .with_context(|| format!("Failed to collect input files from {}", input))?;
    if paths.is_empty() {
        warn!("No files found matching: {}", input);
        return Ok(());
    }

    let files = load_sources(&paths).await;
    if files.is_empty() {
        warn!("None of the {} matched files could be opened", paths.len());
        return Ok(());
    }

    info!("{} Found {} files to process", INFO_PREFIX, files.len());
    let total = files.len();

    let mut session = SessionController::new(options);
    session.submit(files).context("Failed to submit batch")?;

    // Ctrl-C stops the batch before the next file
    let cancel = session.cancel_flag();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let observer = if is_quiet() {
        ProgressBarObserver::hidden()
    } else {
        ProgressBarObserver::new(total)
    };
    let result = session.start(&observer).await;
    ctrl_c.abort();
    result.context("Failed to run batch")?;

    for outcome in session.results() {
        verbose!(
            "{} -> {} ({} -> {}, {:.1}%)",
            outcome.source.name(),
            outcome.export_name(),
            format_file_size(outcome.original_size()),
            format_file_size(outcome.reduced_size),
            outcome.reduction_percent()
        );
    }

    let outcomes = session.results().outcomes();
    if archive {
        let archive_path = output.join(DEFAULT_ARCHIVE_NAME);
        let size = write_archive(outcomes, &archive_path)
            .with_context(|| format!("Failed to write archive {}", archive_path.display()))?;
        info!(
            "{} Archive written: {:?} ({})",
            SUCCESS_PREFIX,
            archive_path,
            format_file_size(size)
        );
    } else {
        let written = write_exports(outcomes, output)
            .with_context(|| format!("Failed to write files to {}", output.display()))?;
        info!(
            "{} Wrote {} files to {:?}",
            SUCCESS_PREFIX,
            written.len(),
            output
        );
    }

    print_summary(session.batch(), started.elapsed());
    Ok(())
}

async fn run_compress(input: &Path, output: &Path, options: &ReductionOptions) -> Result<()> {
    let source = SourceFile::from_path(input)
        .await
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let spinner = (!is_quiet()).then(|| {
        let spinner = create_progress_spinner(&format!("Optimizing {}...", source.name()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    });

    let mut session = SessionController::new(options);
    session.submit(vec![source])?;
    session.start(&NoopObserver).await?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let outcome = session.results().get(0)?;
    if let Some(error) = &outcome.error {
        warn!("{} kept as is: {}", outcome.source.name(), error);
    }
    if let Some((width, height)) = outcome.dimensions {
        verbose!("Output dimensions: {}x{}", width, height);
    }

    let written = write_exports(session.results().outcomes(), output)
        .with_context(|| format!("Failed to write to {}", output.display()))?;
    for path in &written {
        info!(
            "{} {} -> {:?} ({} -> {}, {:.1}% smaller)",
            SUCCESS_PREFIX,
            outcome.source.name(),
            path,
            format_file_size(outcome.original_size()),
            format_file_size(outcome.reduced_size),
            outcome.reduction_percent()
        );
    }

    Ok(())
}

async fn load_sources(paths: &[PathBuf]) -> Vec<SourceFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match SourceFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => warn!("Skipping {:?}: {}", path, e),
        }
    }
    files
}

fn print_summary(batch: &BatchState, elapsed: Duration) {
    let totals = batch.totals();
    let failed = batch.results().failed_count();

    info!(
        "\n{} Processed {}/{} files in {:.2?}",
        SUCCESS_PREFIX,
        batch.processed_count(),
        batch.total_files(),
        elapsed
    );
    info!(
        "{} {}",
        ORIGINAL_SIZE_PREFIX,
        format_file_size(totals.original_bytes)
    );
    info!(
        "{} {}",
        OPTIMIZED_SIZE_PREFIX,
        format_file_size(totals.reduced_bytes)
    );
    info!("{} {:.1}%", REDUCTION_PREFIX, totals.reduction_percent());

    if failed > 0 {
        warn!(
            "{} of {} files could not be reduced and were kept as is",
            failed,
            batch.processed_count()
        );
    }
    if batch.is_cancelled() {
        warn!(
            "Batch cancelled after {} of {} files",
            batch.processed_count(),
            batch.total_files()
        );
    }
}
