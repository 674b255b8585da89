//! Scripted stand-in for the vision service.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;

use phototag::annotation::{AnalysisRequest, VisionService};
use phototag::error::ServiceError;

pub const VALID_REPLY: &str = r##"{
  "photography": {"shot_type": "wide", "orientation": "landscape", "lighting": "daylight",
                  "composition": "rule of thirds", "subject_focus": "tree", "style": "candid"},
  "objects": [{"name": "tree", "confidence": 90, "position": "left"}],
  "people": {"count": 0, "attributes": []},
  "colors": [{"hex": "#336699", "percentage": 40.0}],
  "scene": {"type": "outdoor", "description": "A park"}
}"##;

/// Answers requests from a queue of scripted replies, falling back to a
/// valid annotation once the queue is empty.
pub struct ScriptedService {
    replies: Mutex<VecDeque<Result<String, ServiceError>>>,
    requests: Mutex<Vec<AnalysisRequest>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_error(&self, error: ServiceError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Decoded image payloads of every request, in order. With images
    /// written by `TestHarness::write_image` these are relative paths.
    pub fn requested_images(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(&r.image_data)
                    .expect("image data is not base64");
                String::from_utf8(bytes).expect("image data is not UTF-8")
            })
            .collect()
    }

    pub fn media_types(&self) -> Vec<&'static str> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.media_type)
            .collect()
    }
}

#[async_trait]
impl VisionService for ScriptedService {
    async fn request(&self, request: &AnalysisRequest) -> Result<String, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(VALID_REPLY.to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
