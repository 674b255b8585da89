use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error, info};
use tokio::time::Instant;
use tracing::{info_span, Instrument};

use crate::annotation::{AnalysisOutcome, AnnotationClient, AnthropicVision};
use crate::classifier::ImageItem;
use crate::config::Config;
use crate::error::{AnnotateError, ConfigError};
use crate::sanitize;
use crate::storage::DirectoryStore;

use super::error::PipelineError;
use super::progress::{ProgressEvent, ProgressReporter};
use super::scanner::{scan_directory, DirectoryScanner};
use super::summary::{DirectoryReport, DirectoryState, RunSummary};

/// Annotates every pending image under a root, one request at a time.
pub struct Pipeline {
    client: AnnotationClient,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Pipeline {
    pub fn new(client: AnnotationClient, request_delay: Duration) -> Self {
        Self {
            client,
            request_delay,
            last_request: Mutex::new(None),
        }
    }

    /// Production constructor, backed by the Anthropic Messages API.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let service = AnthropicVision::new(config)?;
        let client = AnnotationClient::new(Arc::new(service), config.schema_mode);
        Ok(Self::new(client, config.request_delay))
    }

    /// Walks `root` depth-first and annotates each directory in turn.
    ///
    /// Only a missing or unreadable root is an error. Problems inside one
    /// directory are logged and the walk moves on.
    pub async fn run(
        &self,
        root: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<RunSummary, PipelineError> {
        let scanner = DirectoryScanner::new(root);
        scanner.check_root()?;

        info!(
            "Annotating images under {} with model {}",
            root.display(),
            self.client.model_name()
        );

        let mut summary = RunSummary::default();
        for directory in scanner.directories() {
            summary.directories += 1;

            let span = info_span!("directory", dir = %sanitize::redact_path(&directory));
            match self
                .process_directory(&directory, progress)
                .instrument(span)
                .await
            {
                Ok(report) => summary.record(&report),
                Err(e) => {
                    error!("Abandoning {}: {}", directory.display(), e);
                    summary.directory_errors += 1;
                }
            }
        }

        info!(
            "Run complete: {} directories, {} annotated, {} skipped, {} failed, {} directory errors",
            summary.directories,
            summary.annotated,
            summary.skipped,
            summary.failed,
            summary.directory_errors
        );
        Ok(summary)
    }

    /// Annotates the pending images directly inside `directory`.
    ///
    /// The document is persisted after every successful annotation, so an
    /// interrupted run loses at most the image in flight.
    pub async fn process_directory(
        &self,
        directory: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<DirectoryReport, PipelineError> {
        let items = scan_directory(directory)?;
        if items.is_empty() {
            debug!("No images in {}", directory.display());
            return Ok(DirectoryReport::idle(DirectoryState::NoImages));
        }

        let store = DirectoryStore::new(directory);
        let mut document = store.load()?;

        let pending = document.pending(&items);
        if pending.is_empty() {
            progress.report(ProgressEvent::DirectoryUpToDate {
                directory: directory.to_path_buf(),
            });
            return Ok(DirectoryReport::idle(DirectoryState::UpToDate));
        }

        progress.report(ProgressEvent::DirectoryStarted {
            directory: directory.to_path_buf(),
            pending: pending.len(),
            total: items.len(),
        });

        let mut report = DirectoryReport::idle(DirectoryState::Annotated);
        let total = pending.len();

        for (index, item) in pending.into_iter().enumerate() {
            progress.report(ProgressEvent::ItemStarted {
                name: item.name.clone(),
                index: index + 1,
                total,
            });

            self.pace().await;
            let outcome = self
                .client
                .analyze(&item.path)
                .instrument(info_span!("annotate", item = %item.name))
                .await;

            match outcome {
                AnalysisOutcome::Annotated(record) => {
                    self.mark_request();
                    document.merge(item, record);
                    store.persist(&document)?;
                    report.annotated += 1;
                    progress.report(ProgressEvent::ItemAnnotated {
                        name: item.name.clone(),
                    });
                }
                AnalysisOutcome::Skipped { reason } => {
                    report.skipped += 1;
                    progress.report(ProgressEvent::ItemSkipped {
                        name: item.name.clone(),
                        reason: reason.to_string(),
                    });
                }
                AnalysisOutcome::Failed(e) => {
                    if e.reached_service() {
                        self.mark_request();
                    }
                    log_failure(item, &e);
                    report.failed += 1;
                    progress.report(ProgressEvent::ItemFailed {
                        name: item.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        progress.report(ProgressEvent::DirectoryFinished {
            directory: directory.to_path_buf(),
            annotated: report.annotated,
            failed: report.failed,
        });
        Ok(report)
    }

    /// Waits until `request_delay` has passed since the previous request.
    async fn pace(&self) {
        let wait = self
            .last_request
            .lock()
            .ok()
            .and_then(|guard| *guard)
            .map(|last| (last + self.request_delay).saturating_duration_since(Instant::now()));

        if let Some(wait) = wait {
            if !wait.is_zero() {
                debug!("Pacing for {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }
    }

    fn mark_request(&self) {
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(Instant::now());
        }
    }
}

fn log_failure(item: &ImageItem, error: &AnnotateError) {
    match error {
        AnnotateError::Parse(e) => error!(
            "Could not parse reply for {}: {}. Reply was: {}",
            item.path.display(),
            e,
            e.raw()
        ),
        AnnotateError::Service(e) => {
            error!("Vision service error for {}: {}", item.path.display(), e)
        }
        other => error!("Error analyzing {}: {}", item.path.display(), other),
    }
}
