//! Core data models for translation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::errors::{ErrorKind, TranslationError};

/// How a unit of text is sent to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMode {
    /// One request for the whole text
    #[default]
    Whole,
    /// One request per non-blank line, with progress after each line
    Chunked,
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationMode::Whole => write!(f, "whole"),
            TranslationMode::Chunked => write!(f, "chunked"),
        }
    }
}

/// Translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    /// Whitespace-only requests never reach the provider
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Translation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// A batch of units translated in input order.
///
/// Unit text is not carried here: it is read per unit through a
/// [`SourceReader`](crate::core::io::SourceReader) so that an unreadable unit
/// fails alone instead of failing the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub units: Vec<String>,
    pub source_lang: String,
    pub target_lang: String,
    #[serde(default)]
    pub mode: TranslationMode,
}

impl BatchJob {
    pub fn new(
        units: Vec<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            units,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            mode: TranslationMode::Whole,
        }
    }

    pub fn with_mode(mut self, mode: TranslationMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Progress notification emitted while a batch runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub unit_index: usize,
    pub unit_id: String,
    pub unit_percent: f64,
    pub overall_percent: f64,
}

impl ProgressEvent {
    /// Event for `unit_index` of `total` units, with the unit itself at `unit_percent`
    pub fn new(unit_index: usize, unit_id: &str, unit_percent: f64, total: usize) -> Self {
        let overall_percent = if total == 0 {
            100.0
        } else {
            100.0 * (unit_index as f64 + unit_percent / 100.0) / total as f64
        };
        Self {
            unit_index,
            unit_id: unit_id.to_string(),
            unit_percent,
            overall_percent,
        }
    }
}

/// One failed unit in a [`BatchReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    pub id: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl UnitFailure {
    pub fn new(id: impl Into<String>, err: &TranslationError) -> Self {
        Self {
            id: id.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<UnitFailure>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: Vec::new(),
            cancelled: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Units that were attempted, successful or not
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.failed.is_empty() && self.succeeded == self.total
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} translated, {} failed",
            self.succeeded,
            self.total,
            self.failed.len()
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}
