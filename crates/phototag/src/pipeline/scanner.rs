use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::classifier::{classify_entry, ImageItem};

use super::error::PipelineError;

/// Walks a photo tree one directory at a time.
pub struct DirectoryScanner {
    root: PathBuf,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fails when the root is missing or cannot be listed.
    pub fn check_root(&self) -> Result<(), PipelineError> {
        if !self.root.is_dir() {
            return Err(PipelineError::RootNotFound(self.root.clone()));
        }
        std::fs::read_dir(&self.root).map_err(|e| PipelineError::UnreadableRoot {
            path: self.root.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Every directory in the tree, the root first, depth-first with
    /// siblings in file name order. Symlinked directories are not followed.
    /// Subdirectories that cannot be read are logged and left out.
    pub fn directories(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path())
    }
}

/// Eligible images directly inside `directory`, in file name order.
pub fn scan_directory(directory: &Path) -> Result<Vec<ImageItem>, PipelineError> {
    let entries = std::fs::read_dir(directory).map_err(|e| PipelineError::ScanDirectory {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let items: Vec<ImageItem> = paths.iter().filter_map(|p| classify_entry(p)).collect();
    debug!(
        "Found {} image(s) among {} entries in {}",
        items.len(),
        paths.len(),
        directory.display()
    );
    Ok(items)
}
