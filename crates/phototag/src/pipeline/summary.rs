/// Where a directory ended up after one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryState {
    /// No eligible images; the metadata document was not touched.
    NoImages,
    /// Every image already had a record.
    UpToDate,
    /// Pending images were attempted.
    Annotated,
}

/// Counts for a single directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryReport {
    pub state: DirectoryState,
    pub annotated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DirectoryReport {
    pub fn idle(state: DirectoryState) -> Self {
        Self {
            state,
            annotated: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub directories: usize,
    /// Directories abandoned because they could not be listed or their
    /// metadata could not be read or written.
    pub directory_errors: usize,
    pub annotated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &DirectoryReport) {
        self.annotated += report.annotated;
        self.skipped += report.skipped;
        self.failed += report.failed;
    }
}
