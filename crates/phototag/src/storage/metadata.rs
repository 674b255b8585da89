use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotation::AnnotationRecord;
use crate::classifier::ImageItem;
use crate::error::StoreError;

pub const METADATA_FILE_NAME: &str = "metadata.json";
const TEMP_SUFFIX: &str = "tmp";

/// Annotations of one directory, keyed by image file name.
///
/// A key is present only for images that were annotated successfully.
/// Stored values are kept as found, so entries written by other tools
/// still mark their image as done.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataDocument {
    entries: BTreeMap<String, Value>,
}

impl MetadataDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Items without a record, in the order given.
    pub fn pending<'a>(&self, items: &'a [ImageItem]) -> Vec<&'a ImageItem> {
        items
            .iter()
            .filter(|item| !self.contains(&item.name))
            .collect()
    }

    /// Inserts the record under the item's name, replacing any previous one.
    pub fn merge(&mut self, item: &ImageItem, record: AnnotationRecord) {
        self.entries.insert(item.name.clone(), record.into());
    }
}

/// Durable home of one directory's [`MetadataDocument`].
pub struct DirectoryStore {
    directory: PathBuf,
    path: PathBuf,
}

impl DirectoryStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        let directory = directory.as_ref().to_path_buf();
        let path = directory.join(METADATA_FILE_NAME);
        Self { directory, path }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored document.
    ///
    /// A missing file is an empty document. A file that is not a JSON
    /// object is moved aside and also yields an empty document, so one damaged
    /// directory never stops a run. Only an unreadable file is an error.
    pub fn load(&self) -> Result<MetadataDocument, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(MetadataDocument::new())
            }
            Err(e) => {
                return Err(StoreError::ReadDocument {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        match serde_json::from_str::<MetadataDocument>(&content) {
            Ok(document) => {
                debug!(
                    "Loaded {} record(s) from {}",
                    document.len(),
                    self.path.display()
                );
                Ok(document)
            }
            Err(e) => {
                warn!(
                    "Corrupted metadata file in {}: {}",
                    self.directory.display(),
                    e
                );
                self.quarantine();
                Ok(MetadataDocument::new())
            }
        }
    }

    fn quarantine(&self) {
        let backup = self.path.with_extension(format!(
            "json.corrupt-{}",
            Utc::now().format("%Y%m%dT%H%M%SZ")
        ));

        match std::fs::rename(&self.path, &backup) {
            Ok(()) => warn!("Moved corrupted metadata to {}", backup.display()),
            Err(e) => warn!(
                "Could not move corrupted metadata {} aside: {}",
                self.path.display(),
                e
            ),
        }
    }

    /// Replaces the stored document with `document`.
    ///
    /// The document is written to a sibling temp file and renamed into
    /// place, so readers see either the old or the new document in full.
    pub fn persist(&self, document: &MetadataDocument) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(document)?;
        json.push('\n');

        let temp_path = self.path.with_extension(format!("json.{}", TEMP_SUFFIX));
        let write_err = |e| StoreError::WriteDocument {
            path: temp_path.clone(),
            source: e,
        };

        let mut file = std::fs::File::create(&temp_path).map_err(write_err)?;
        file.write_all(json.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::WriteDocument {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(
            "Persisted {} record(s) to {}",
            document.len(),
            self.path.display()
        );
        Ok(())
    }
}
