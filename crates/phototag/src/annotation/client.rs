use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use log::debug;

use crate::annotation::normalizer::{normalize, SchemaMode};
use crate::annotation::prompt::{SYSTEM_INSTRUCTION, USER_INSTRUCTION};
use crate::annotation::record::AnnotationRecord;
use crate::classifier::{classify, ImageFormat};
use crate::error::{AnnotateError, ServiceError};

/// One image plus the instructions, ready for the vision service.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub system_instruction: &'static str,
    pub user_instruction: &'static str,
    pub media_type: &'static str,
    /// Base64 encoded image bytes.
    pub image_data: String,
}

/// Remote service that answers an [`AnalysisRequest`] with reply text.
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn request(&self, request: &AnalysisRequest) -> Result<String, ServiceError>;

    fn model_name(&self) -> &str;
}

/// Result of analyzing one path.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Annotated(AnnotationRecord),
    /// Not an eligible image; no request was made.
    Skipped { reason: AnnotateError },
    Failed(AnnotateError),
}

impl AnalysisOutcome {
    pub fn is_annotated(&self) -> bool {
        matches!(self, Self::Annotated(_))
    }
}

/// Sends images to a [`VisionService`] and normalizes the replies.
pub struct AnnotationClient {
    service: Arc<dyn VisionService>,
    schema_mode: SchemaMode,
}

impl AnnotationClient {
    pub fn new(service: Arc<dyn VisionService>, schema_mode: SchemaMode) -> Self {
        Self {
            service,
            schema_mode,
        }
    }

    pub fn model_name(&self) -> &str {
        self.service.model_name()
    }

    /// Makes at most one service request. Never retries.
    pub async fn analyze(&self, path: &Path) -> AnalysisOutcome {
        let format = match classify(path) {
            Some(format) => format,
            None => {
                return AnalysisOutcome::Skipped {
                    reason: AnnotateError::UnsupportedFormat(path.to_path_buf()),
                }
            }
        };

        match self.annotate(path, format).await {
            Ok(record) => AnalysisOutcome::Annotated(record),
            Err(e) => AnalysisOutcome::Failed(e),
        }
    }

    async fn annotate(
        &self,
        path: &Path,
        format: ImageFormat,
    ) -> Result<AnnotationRecord, AnnotateError> {
        let request = build_request(path, format).await?;
        debug!(
            "Requesting annotation for {} ({}, {} base64 bytes)",
            path.display(),
            request.media_type,
            request.image_data.len()
        );

        let reply = self.service.request(&request).await?;
        let record = normalize(&reply, self.schema_mode)?;
        Ok(record)
    }
}

async fn build_request(path: &Path, format: ImageFormat) -> Result<AnalysisRequest, AnnotateError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AnnotateError::ReadImage {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(AnalysisRequest {
        system_instruction: SYSTEM_INSTRUCTION,
        user_instruction: USER_INSTRUCTION,
        media_type: format.media_type(),
        image_data: base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}
