//! Isolated photo tree for driving the pipeline end to end.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tempfile::TempDir;

use phototag::annotation::{AnnotationClient, SchemaMode};
use phototag::pipeline::{NoopProgress, Pipeline, PipelineError, RunSummary};
use phototag::storage::METADATA_FILE_NAME;

use super::mock::ScriptedService;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Root of the photo tree, `<temp>/img`.
    pub root: PathBuf,
    pub service: Arc<ScriptedService>,
    schema_mode: SchemaMode,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("img");
        std::fs::create_dir_all(&root).expect("Failed to create root");

        Self {
            temp_dir,
            root,
            service: Arc::new(ScriptedService::new()),
            schema_mode: SchemaMode::Lenient,
        }
    }

    pub fn strict(mut self) -> Self {
        self.schema_mode = SchemaMode::Strict;
        self
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes an image whose bytes are its own relative path, so requests
    /// can be traced back to the file they came from.
    pub fn write_image(&self, relative: &str) -> PathBuf {
        self.write_file(relative, relative.as_bytes())
    }

    pub fn write_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn create_dir(&self, relative: &str) -> PathBuf {
        let path = self.root.join(relative);
        std::fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    pub fn metadata_path(&self, relative_dir: &str) -> PathBuf {
        self.root.join(relative_dir).join(METADATA_FILE_NAME)
    }

    pub fn write_metadata(&self, relative_dir: &str, content: &str) {
        std::fs::write(self.metadata_path(relative_dir), content)
            .expect("Failed to write metadata");
    }

    pub fn read_metadata(&self, relative_dir: &str) -> Value {
        let content = std::fs::read_to_string(self.metadata_path(relative_dir))
            .expect("Failed to read metadata");
        serde_json::from_str(&content).expect("metadata.json is not valid JSON")
    }

    /// Keys of a directory's metadata document, in stored order.
    pub fn metadata_keys(&self, relative_dir: &str) -> Vec<String> {
        match self.read_metadata(relative_dir) {
            Value::Object(map) => map.keys().cloned().collect(),
            other => panic!("Expected an object, got {}", other),
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        let client = AnnotationClient::new(self.service.clone(), self.schema_mode);
        Pipeline::new(client, Duration::ZERO)
    }

    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        self.pipeline().run(&self.root, &NoopProgress).await
    }
}
