//! Decides which directory entries are images the vision service accepts.

use std::path::{Path, PathBuf};

use log::debug;

/// Image formats accepted by the vision service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    /// Matches the eligible extensions, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

/// An eligible image inside a directory, keyed by its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub name: String,
    pub path: PathBuf,
    pub format: ImageFormat,
}

impl ImageItem {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}

/// Resolves the content type of a path from its name alone.
///
/// The extension must be one of jpg/jpeg/png/webp and the name must map to
/// an accepted media type. When the type database has no answer for a
/// jpg/jpeg name, JPEG is assumed.
pub fn classify(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    let by_extension = ImageFormat::from_extension(ext)?;

    let guessed = mime_guess::from_path(path)
        .iter()
        .find_map(|mime| ImageFormat::from_media_type(mime.essence_str()));

    match guessed {
        Some(format) => Some(format),
        None if by_extension == ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        None => None,
    }
}

/// Classifies a filesystem entry. Directories, non-image files and names
/// that are not valid UTF-8 are ineligible.
pub fn classify_entry(path: &Path) -> Option<ImageItem> {
    if !path.is_file() {
        return None;
    }

    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => {
            debug!("Ignoring non UTF-8 file name: {}", path.display());
            return None;
        }
    };

    let format = classify(path)?;
    Some(ImageItem {
        name,
        path: path.to_path_buf(),
        format,
    })
}
