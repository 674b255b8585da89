pub mod annotation;
pub mod classifier;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sanitize;
pub mod storage;

pub use annotation::{
    AnalysisOutcome, AnalysisRequest, AnnotationClient, AnnotationRecord, AnthropicVision,
    SchemaMode, VisionService,
};
pub use classifier::{classify, ImageFormat, ImageItem};
pub use config::{load_config, Config, ConfigOverrides};
pub use error::{
    AnnotateError, ConfigError, ParseError, PhototagError, Result, ServiceError, StoreError,
};
pub use pipeline::{LogProgress, NoopProgress, Pipeline, PipelineError, RunSummary};
pub use storage::{DirectoryStore, MetadataDocument};
