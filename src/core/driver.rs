//! Translation driver: single text, line-chunked text and ordered batches

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::io::{OutputSink, SourceReader};
use crate::core::models::{
    BatchJob, BatchReport, ProgressEvent, TranslationMode, TranslationRequest, UnitFailure,
};
use crate::core::provider::TranslationProvider;

/// Cooperative stop flag, checked at chunk and unit boundaries
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
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

/// Pacing between provider requests
#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    pub chunk_delay: Duration,
    pub unit_delay: Duration,
}

impl From<&TranslatorConfig> for DriverOptions {
    fn from(config: &TranslatorConfig) -> Self {
        Self {
            chunk_delay: config.chunk_delay(),
            unit_delay: config.unit_delay(),
        }
    }
}

/// Sequential translation driver over a [`TranslationProvider`].
///
/// At most one provider request is outstanding at any time. Cloning is cheap
/// and shares the provider.
#[derive(Clone)]
pub struct TranslationDriver {
    provider: Arc<dyn TranslationProvider>,
    options: DriverOptions,
    cancel: CancelToken,
}

impl TranslationDriver {
    /// Create a new driver
    pub fn new(provider: Arc<dyn TranslationProvider>, options: DriverOptions) -> Self {
        Self {
            provider,
            options,
            cancel: CancelToken::new(),
        }
    }

    /// Replace the cancel token observed by this driver
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Translate a whole text with a single provider request.
    ///
    /// Empty or whitespace-only input returns an empty string without a request.
    pub async fn translate_one(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let request = TranslationRequest::new(text, source_lang, target_lang);
        if request.is_blank() {
            debug!("Skipping blank input");
            return Ok(String::new());
        }

        self.provider
            .translate(&request.text, &request.source_lang, &request.target_lang)
            .await
    }

    /// Translate `text` line by line, reporting percent complete after each line.
    ///
    /// Blank lines are kept verbatim and never sent. A line the provider fails
    /// on is kept untranslated; the call still succeeds. The output always has
    /// the same number of lines as the input.
    pub async fn translate_chunked<F>(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        mut on_progress: F,
    ) -> Result<String>
    where
        F: FnMut(f64) + Send,
    {
        let chunks: Vec<&str> = text.split('\n').collect();
        let total = chunks.len();
        let mut translated = Vec::with_capacity(total);
        let mut requested = false;

        for (i, chunk) in chunks.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Chunked translation cancelled after {}/{} lines", i, total);
                return Err(TranslationError::Cancelled);
            }

            if chunk.trim().is_empty() {
                translated.push((*chunk).to_string());
            } else {
                if requested && !self.options.chunk_delay.is_zero() {
                    sleep(self.options.chunk_delay).await;
                }
                requested = true;
                translated.push(self.translate_line(chunk, source_lang, target_lang).await);
            }

            on_progress(100.0 * (i + 1) as f64 / total as f64);
        }

        Ok(translated.join("\n"))
    }

    async fn translate_line(&self, line: &str, source_lang: &str, target_lang: &str) -> String {
        let (body, cr) = match line.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (line, ""),
        };

        match self.provider.translate(body, source_lang, target_lang).await {
            Ok(result) => {
                let single_line = result.replace("\r\n", " ").replace('\n', " ");
                format!("{}{}", single_line, cr)
            }
            Err(e) => {
                warn!("Keeping line untranslated: {}", e);
                line.to_string()
            }
        }
    }

    /// Translate every unit of `job` in order, writing successes to `sink`.
    ///
    /// Unit failures are recorded in the report and never abort the batch.
    /// Only an invalid job is an error. A cancelled run returns the partial
    /// report with `cancelled` set.
    pub async fn translate_batch<F>(
        &self,
        job: &BatchJob,
        reader: &dyn SourceReader,
        sink: &mut dyn OutputSink,
        mut on_progress: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(ProgressEvent) + Send,
    {
        if job.source_lang.trim().is_empty() || job.target_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError {
                message: "source and target language are required".to_string(),
            });
        }

        let total = job.units.len();
        let mut report = BatchReport::new(total);
        info!(
            "Starting batch of {} units ({} -> {}, {} mode, provider {})",
            total,
            job.source_lang,
            job.target_lang,
            job.mode,
            self.provider.name()
        );

        for (index, id) in job.units.iter().enumerate() {
            if index > 0 && !self.options.unit_delay.is_zero() && !self.cancel.is_cancelled() {
                sleep(self.options.unit_delay).await;
            }

            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let outcome = self
                .translate_unit(job, index, id, reader, sink, &mut on_progress)
                .await;

            match outcome {
                Ok(()) => {
                    report.succeeded += 1;
                    debug!("Unit {} translated", id);
                }
                Err(TranslationError::Cancelled) => {
                    report.cancelled = true;
                    break;
                }
                Err(e) => {
                    warn!("Unit {} failed: {}", id, e);
                    report.failed.push(UnitFailure::new(id.clone(), &e));
                }
            }

            on_progress(ProgressEvent::new(index, id, 100.0, total));
        }

        report.finish();
        info!("Batch finished: {}", report);
        Ok(report)
    }

    async fn translate_unit<F>(
        &self,
        job: &BatchJob,
        index: usize,
        id: &str,
        reader: &dyn SourceReader,
        sink: &mut dyn OutputSink,
        on_progress: &mut F,
    ) -> Result<()>
    where
        F: FnMut(ProgressEvent) + Send,
    {
        let text = reader.read(id).await?;
        let total = job.units.len();

        let translated = match job.mode {
            TranslationMode::Whole => {
                self.translate_one(&text, &job.source_lang, &job.target_lang)
                    .await?
            }
            TranslationMode::Chunked => {
                self.translate_chunked(&text, &job.source_lang, &job.target_lang, |percent| {
                    on_progress(ProgressEvent::new(index, id, percent, total))
                })
                .await?
            }
        };

        sink.write(id, &translated).await
    }
}
