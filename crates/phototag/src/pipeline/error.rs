use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to read root directory '{path}': {source}")]
    UnreadableRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list directory '{path}': {source}")]
    ScanDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Metadata store failed: {0}")]
    Store(#[from] crate::error::StoreError),
}

impl PipelineError {
    /// Errors that end the whole run rather than one directory.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RootNotFound(_) | Self::UnreadableRoot { .. })
    }
}
