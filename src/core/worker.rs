//! Background translation worker
//!
//! Runs a [`TranslationDriver`] on its own tokio task. Front-ends submit
//! commands over a channel and consume [`WorkerEvent`]s from another, so they
//! never await a network call themselves.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::core::driver::{CancelToken, TranslationDriver};
use crate::core::errors::{Result, TranslationError};
use crate::core::io::{OutputSink, SourceReader};
use crate::core::models::{BatchJob, BatchReport, ProgressEvent, TranslationMode, TranslationResult};

/// Pending commands the worker accepts before `submit_*` waits
const COMMAND_QUEUE: usize = 16;

/// Work item accepted by the worker
pub enum WorkerCommand {
    TranslateText {
        id: String,
        text: String,
        source_lang: String,
        target_lang: String,
        mode: TranslationMode,
        cancel: CancelToken,
    },
    TranslateBatch {
        job: BatchJob,
        reader: Box<dyn SourceReader>,
        sink: Box<dyn OutputSink>,
        cancel: CancelToken,
    },
}

/// Notification sent back by the worker
#[derive(Debug)]
pub enum WorkerEvent {
    Progress(ProgressEvent),
    TextFinished {
        id: String,
        result: Result<TranslationResult>,
    },
    BatchFinished(Result<BatchReport>),
}

/// Handle to a running worker task
pub struct TranslationWorker {
    commands: mpsc::Sender<WorkerCommand>,
    events: mpsc::UnboundedReceiver<WorkerEvent>,
    task: JoinHandle<()>,
}

impl TranslationWorker {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(driver: TranslationDriver) -> Self {
        let (commands, command_rx) = mpsc::channel(COMMAND_QUEUE);
        let (event_tx, events) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_worker(driver, command_rx, event_tx));

        Self {
            commands,
            events,
            task,
        }
    }

    /// Queue a text translation; returns the token that cancels it
    pub async fn submit_text(
        &self,
        id: impl Into<String>,
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        mode: TranslationMode,
    ) -> Result<CancelToken> {
        let cancel = CancelToken::new();
        self.send(WorkerCommand::TranslateText {
            id: id.into(),
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            mode,
            cancel: cancel.clone(),
        })
        .await?;
        Ok(cancel)
    }

    /// Queue a batch; returns the token that cancels it
    pub async fn submit_batch(
        &self,
        job: BatchJob,
        reader: Box<dyn SourceReader>,
        sink: Box<dyn OutputSink>,
    ) -> Result<CancelToken> {
        let cancel = CancelToken::new();
        self.send(WorkerCommand::TranslateBatch {
            job,
            reader,
            sink,
            cancel: cancel.clone(),
        })
        .await?;
        Ok(cancel)
    }

    async fn send(&self, command: WorkerCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| TranslationError::InternalError("translation worker has stopped".to_string()))
    }

    /// Next event, or `None` once the worker has stopped
    pub async fn next_event(&mut self) -> Option<WorkerEvent> {
        self.events.recv().await
    }

    /// Stop accepting commands and wait for queued work to finish
    pub async fn shutdown(self) -> Result<()> {
        drop(self.commands);
        self.task
            .await
            .map_err(|e| TranslationError::InternalError(e.to_string()))
    }
}

async fn run_worker(
    driver: TranslationDriver,
    mut commands: mpsc::Receiver<WorkerCommand>,
    events: mpsc::UnboundedSender<WorkerEvent>,
) {
    info!("Translation worker started (provider {})", driver.provider_name());

    while let Some(command) = commands.recv().await {
        match command {
            WorkerCommand::TranslateText {
                id,
                text,
                source_lang,
                target_lang,
                mode,
                cancel,
            } => {
                debug!("Worker translating text {}", id);
                let driver = driver.clone().with_cancel_token(cancel);
                let result = match mode {
                    TranslationMode::Whole => {
                        driver.translate_one(&text, &source_lang, &target_lang).await
                    }
                    TranslationMode::Chunked => {
                        let progress = events.clone();
                        driver
                            .translate_chunked(&text, &source_lang, &target_lang, |percent| {
                                let _ = progress.send(WorkerEvent::Progress(ProgressEvent::new(
                                    0, &id, percent, 1,
                                )));
                            })
                            .await
                    }
                };
                let result = result.map(|text| TranslationResult { text });
                let _ = events.send(WorkerEvent::TextFinished { id, result });
            }
            WorkerCommand::TranslateBatch {
                job,
                reader,
                mut sink,
                cancel,
            } => {
                debug!("Worker starting batch of {} units", job.units.len());
                let driver = driver.clone().with_cancel_token(cancel);
                let progress = events.clone();
                let report = driver
                    .translate_batch(&job, reader.as_ref(), sink.as_mut(), |event| {
                        let _ = progress.send(WorkerEvent::Progress(event));
                    })
                    .await;
                let _ = events.send(WorkerEvent::BatchFinished(report));
            }
        }
    }

    info!("Translation worker stopped");
}
