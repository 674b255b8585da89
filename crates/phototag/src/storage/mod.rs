pub mod metadata;

pub use metadata::{DirectoryStore, MetadataDocument, METADATA_FILE_NAME};
