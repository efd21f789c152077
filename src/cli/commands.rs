//! CLI command definitions and handlers

use clap::Subcommand;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::core::client::GoogleTranslator;
use crate::core::config::TranslatorConfig;
use crate::core::driver::{DriverOptions, TranslationDriver};
use crate::core::models::{BatchReport, TranslationMode};
use crate::core::worker::{TranslationWorker, WorkerEvent};
use crate::processors::text::{default_output_path, DirectoryOptions, OutputNaming, TextFileProcessor};

/// Commands for the text translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a piece of text (argument or stdin)
    Text {
        /// Text to translate; read from stdin when omitted
        text: Option<String>,

        /// Translate line by line with progress
        #[arg(long)]
        chunked: bool,

        /// Write the translation to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate a single .txt file
    File {
        /// Input file (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file (default: <name>_translated.txt next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Translate line by line with progress
        #[arg(long)]
        chunked: bool,
    },

    /// Translate every .txt file of a directory
    Batch {
        /// Input directory (required)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory, created if missing (required)
        #[arg(short, long)]
        output: PathBuf,

        /// Keep input file names instead of adding a suffix
        #[arg(long, conflicts_with = "suffix")]
        keep_names: bool,

        /// Suffix added to output file names (default from config: _translated)
        #[arg(long)]
        suffix: Option<String>,

        /// Include .txt files in subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Only translate these files (repeatable)
        #[arg(long)]
        only: Vec<String>,

        /// Translate line by line with progress
        #[arg(long)]
        chunked: bool,

        /// Write a JSON report of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn mode(chunked: bool) -> TranslationMode {
    if chunked {
        TranslationMode::Chunked
    } else {
        TranslationMode::Whole
    }
}

fn percent_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

fn build_driver(config: &TranslatorConfig) -> anyhow::Result<TranslationDriver> {
    let provider = Arc::new(GoogleTranslator::new(config.clone())?);
    Ok(TranslationDriver::new(provider, DriverOptions::from(config)))
}

/// Output naming chosen from the batch flags, falling back to the config suffix
pub fn output_naming(keep_names: bool, suffix: Option<String>, config: &TranslatorConfig) -> OutputNaming {
    if keep_names {
        return OutputNaming::Same;
    }
    OutputNaming::from_suffix(suffix.as_deref().unwrap_or(&config.output_suffix))
}

/// Handle text translation command
pub async fn handle_text(
    config: &TranslatorConfig,
    text: Option<String>,
    chunked: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };

    if text.trim().is_empty() {
        anyhow::bail!("Nothing to translate");
    }

    info!(
        "Translating text ({} -> {}, chunked: {})",
        config.source_lang, config.target_lang, chunked
    );

    let mut worker = TranslationWorker::spawn(build_driver(config)?);
    worker
        .submit_text("text", text, &config.source_lang, &config.target_lang, mode(chunked))
        .await?;

    let pb = percent_bar(100);
    let translated = loop {
        match worker.next_event().await {
            Some(WorkerEvent::Progress(event)) => pb.set_position(event.unit_percent as u64),
            Some(WorkerEvent::TextFinished { result, .. }) => break result,
            Some(WorkerEvent::BatchFinished(_)) => {}
            None => anyhow::bail!("Translation worker stopped unexpectedly"),
        }
    };
    pb.finish_and_clear();
    worker.shutdown().await?;

    let translated = translated?.text;
    match output {
        Some(path) => {
            tokio::fs::write(&path, &translated).await?;
            println!("✅ Translation saved to {}", path.display());
        }
        None => println!("{}", translated),
    }

    Ok(())
}

/// Handle single file translation command
pub async fn handle_file(
    config: &TranslatorConfig,
    file: PathBuf,
    output: Option<PathBuf>,
    chunked: bool,
) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let output = output.unwrap_or_else(|| default_output_path(&file, &config.output_suffix));

    info!("Starting file translation");
    info!("Input: {}", file.display());
    info!("Output: {}", output.display());
    info!("Languages: {} -> {}", config.source_lang, config.target_lang);

    let processor = TextFileProcessor::from_config(config)?;

    let pb = percent_bar(100);
    pb.set_message(file.display().to_string());
    let bar = pb.clone();
    processor
        .translate_file(
            &file,
            &output,
            &config.source_lang,
            &config.target_lang,
            mode(chunked),
            move |percent| bar.set_position(percent as u64),
        )
        .await?;
    pb.finish_with_message("Completed");

    println!("\n✅ Translation completed!");
    println!("   Output: {}", output.display());
    println!("   Time: {:?}", start_time.elapsed());

    Ok(())
}

/// Handle directory batch translation command
#[allow(clippy::too_many_arguments)]
pub async fn handle_batch(
    config: &TranslatorConfig,
    input: PathBuf,
    output: PathBuf,
    naming: OutputNaming,
    recursive: bool,
    only: Vec<String>,
    chunked: bool,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let start_time = Instant::now();

    info!("Starting batch translation");
    info!("Input: {}", input.display());
    info!("Output: {}", output.display());
    info!("Languages: {} -> {}", config.source_lang, config.target_lang);
    info!("Recursive: {}", recursive);

    let driver = build_driver(config)?;
    let processor = TextFileProcessor::new(driver.clone());
    let options = DirectoryOptions {
        source_lang: config.source_lang.clone(),
        target_lang: config.target_lang.clone(),
        mode: mode(chunked),
        naming,
        recursive,
        only,
    };

    let (job, source, sink) = processor.prepare_directory(&input, &output, &options)?;
    if job.units.is_empty() {
        anyhow::bail!("{}", empty_selection_message(&input, &options.only));
    }

    let mut worker = TranslationWorker::spawn(driver);
    let cancel = worker
        .submit_batch(job, Box::new(source), Box::new(sink))
        .await?;

    let bars = MultiProgress::new();
    let current = bars.add(percent_bar(100));
    let overall = bars.add(percent_bar(100));
    overall.set_message("total");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancel_requested = false;

    let report = loop {
        tokio::select! {
            signal = &mut ctrl_c, if !cancel_requested => {
                signal?;
                cancel_requested = true;
                cancel.cancel();
                overall.set_message("cancelling after current step...");
            }
            event = worker.next_event() => match event {
                Some(WorkerEvent::Progress(event)) => {
                    current.set_message(event.unit_id.clone());
                    current.set_position(event.unit_percent as u64);
                    overall.set_position(event.overall_percent as u64);
                }
                Some(WorkerEvent::BatchFinished(report)) => break report?,
                Some(WorkerEvent::TextFinished { .. }) => {}
                None => anyhow::bail!("Translation worker stopped unexpectedly"),
            }
        }
    };

    current.finish_and_clear();
    overall.finish_with_message("Completed");
    worker.shutdown().await?;

    let duration = start_time.elapsed();
    info!("Completed: {} in {:?}", report, duration);

    print_summary(&report);
    println!("   Time: {:?}", duration);

    if let Some(path) = report_path {
        write_report(&report, &path).await?;
        println!("\n📝 Report saved to: {}", path.display());
    }

    Ok(())
}

fn empty_selection_message(input: &Path, only: &[String]) -> String {
    if only.is_empty() {
        format!("No .txt files found in {}", input.display())
    } else {
        format!(
            "No .txt files in {} match --only {}",
            input.display(),
            only.join(", ")
        )
    }
}

fn print_summary(report: &BatchReport) {
    if report.cancelled {
        println!("\n⚠️  Translation cancelled!");
    } else {
        println!("\n✅ Translation completed!");
    }
    println!("   Translated: {}/{}", report.succeeded, report.total);
    println!("   Failed: {}", report.failed.len());

    for failure in &report.failed {
        eprintln!("   ❌ {} [{}]: {}", failure.id, failure.kind, failure.message);
    }
}

/// Save a batch report as pretty JSON
pub async fn write_report(report: &BatchReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
