use std::path::PathBuf;

use log::{info, warn};

/// Events emitted while a tree is annotated.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    DirectoryStarted {
        directory: PathBuf,
        pending: usize,
        total: usize,
    },
    /// Every image in the directory already has a record.
    DirectoryUpToDate { directory: PathBuf },
    ItemStarted {
        name: String,
        index: usize,
        total: usize,
    },
    ItemAnnotated { name: String },
    ItemSkipped { name: String, reason: String },
    ItemFailed { name: String, error: String },
    DirectoryFinished {
        directory: PathBuf,
        annotated: usize,
        failed: usize,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Writes progress lines through the `log` facade.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::DirectoryStarted {
                directory,
                pending,
                total,
            } => info!(
                "Processing {} of {} images in {}",
                pending,
                total,
                directory.display()
            ),
            ProgressEvent::DirectoryUpToDate { directory } => {
                info!("No new images in {}", directory.display())
            }
            ProgressEvent::ItemStarted { name, index, total } => {
                info!("[{}/{}] {}", index, total, name)
            }
            ProgressEvent::ItemAnnotated { name } => info!("Annotated {}", name),
            ProgressEvent::ItemSkipped { name, reason } => info!("Skipping {}: {}", name, reason),
            ProgressEvent::ItemFailed { name, error } => warn!("Failed {}: {}", name, error),
            ProgressEvent::DirectoryFinished {
                directory,
                annotated,
                failed,
            } => info!(
                "Finished {}: {} annotated, {} failed",
                directory.display(),
                annotated,
                failed
            ),
        }
    }
}
