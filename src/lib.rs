//! Text Translator - sequential translation library for text and `.txt` files
//!
//! This library drives a replaceable translation provider over single texts,
//! line-chunked texts with progress, and ordered batches of files that
//! tolerate per-file failures.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod processors;

// Re-export key types for convenience
pub use crate::core::{
    client::GoogleTranslator,
    config::TranslatorConfig,
    driver::{CancelToken, DriverOptions, TranslationDriver},
    errors::{ErrorKind, TranslationError},
    io::{MemoryStore, OutputSink, SourceReader},
    models::{BatchJob, BatchReport, ProgressEvent, TranslationMode, TranslationRequest, TranslationResult, UnitFailure},
    provider::TranslationProvider,
    worker::{TranslationWorker, WorkerEvent},
};

pub use crate::processors::text::{DirectoryOptions, OutputNaming, TextFileProcessor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
