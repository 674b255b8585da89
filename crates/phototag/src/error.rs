use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhototagError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Annotation error: {0}")]
    Annotate(#[from] AnnotateError),

    #[error("Metadata store error: {0}")]
    Store(#[from] StoreError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing credential: environment variable '{name}' is not set")]
    MissingCredential { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    NotUnicode { name: String },

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failure of the remote vision service call itself.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Service reply contained no text")]
    EmptyReply,

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// The service replied, but the reply could not be turned into a record.
///
/// Every variant carries the raw reply so it can be logged for diagnosis.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Reply opens a code fence that is never closed")]
    UnterminatedFence { raw: String },

    #[error("Reply is not valid JSON: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Reply JSON is not an object")]
    NotAnObject { raw: String },

    #[error("Reply JSON is an empty object")]
    Empty { raw: String },

    #[error("Reply does not match the annotation schema: {source}")]
    Schema {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    pub fn raw(&self) -> &str {
        match self {
            Self::UnterminatedFence { raw }
            | Self::InvalidJson { raw, .. }
            | Self::NotAnObject { raw }
            | Self::Empty { raw }
            | Self::Schema { raw, .. } => raw,
        }
    }
}

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to read image '{path}': {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Vision service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Could not parse vision reply: {0}")]
    Parse(#[from] ParseError),
}

impl AnnotateError {
    /// Whether a request went out to the vision service before the failure.
    pub fn reached_service(&self) -> bool {
        matches!(self, Self::Service(_) | Self::Parse(_))
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read metadata document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write metadata document '{path}': {source}")]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize metadata document: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PhototagError>;
