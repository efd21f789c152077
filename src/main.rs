//! Main entry point for the text translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use text_translator::cli::commands::{self, Commands};
use text_translator::TranslatorConfig;

/// Text translator - translate text and .txt files through a web translation service
#[derive(Parser, Debug)]
#[command(name = "text-translator", version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON or TOML); TRANSLATOR_* env vars override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Source language code (default: en)
    #[arg(short, long, global = true)]
    source_lang: Option<String>,

    /// Target language code (default: pt)
    #[arg(short, long, global = true)]
    target_lang: Option<String>,

    /// Delay between line requests in milliseconds
    #[arg(long, global = true)]
    chunk_delay_ms: Option<u64>,

    /// Delay between files in milliseconds
    #[arg(long, global = true)]
    unit_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Override config with CLI args if provided
    let mut config = TranslatorConfig::load(args.config.as_deref())?;
    if let Some(source_lang) = args.source_lang {
        config.source_lang = source_lang;
    }
    if let Some(target_lang) = args.target_lang {
        config.target_lang = target_lang;
    }
    if let Some(delay) = args.chunk_delay_ms {
        config.chunk_delay_ms = delay;
    }
    if let Some(delay) = args.unit_delay_ms {
        config.unit_delay_ms = delay;
    }
    config.validate()?;

    // Execute command
    match args.command {
        Some(Commands::Text {
            text,
            chunked,
            output,
        }) => {
            commands::handle_text(&config, text, chunked, output).await?;
        }
        Some(Commands::File {
            file,
            output,
            chunked,
        }) => {
            commands::handle_file(&config, file, output, chunked).await?;
        }
        Some(Commands::Batch {
            input,
            output,
            keep_names,
            suffix,
            recursive,
            only,
            chunked,
            report,
        }) => {
            let naming = commands::output_naming(keep_names, suffix, &config);
            commands::handle_batch(&config, input, output, naming, recursive, only, chunked, report)
                .await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
