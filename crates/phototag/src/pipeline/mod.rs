pub mod error;
pub mod progress;
pub mod runner;
pub mod scanner;
pub mod summary;

pub use error::PipelineError;
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::Pipeline;
pub use scanner::{scan_directory, DirectoryScanner};
pub use summary::{DirectoryReport, DirectoryState, RunSummary};
