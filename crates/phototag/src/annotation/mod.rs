//! Vision-service annotation: request building, the service boundary and
//! reply normalization.

pub mod anthropic;
pub mod client;
pub mod normalizer;
pub mod prompt;
pub mod record;

pub use anthropic::AnthropicVision;
pub use client::{AnalysisOutcome, AnalysisRequest, AnnotationClient, VisionService};
pub use normalizer::{normalize, ReplyShape, SchemaMode};
pub use record::{Annotation, AnnotationRecord};
