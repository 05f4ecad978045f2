//! Pairing current file metadata with the catalog's stored metadata

use std::path::Path;

use crate::Result;
use crate::classifier::FreshnessClassifier;
use crate::snapshot::{FileMetadataState, MetadataSnapshot};
use crate::status::MetadataReport;

/// Reads metadata from a data file.
pub trait MetadataExtractor {
    fn extract(&self, file: &Path) -> Result<MetadataSnapshot>;
}

/// Catalog items describing data files.
pub trait ItemStore {
    /// Metadata recorded for `file`, or `None` if the catalog has no item.
    fn stored_metadata(&self, file: &Path) -> Result<Option<MetadataSnapshot>>;

    fn create_item(&self, file: &Path, snapshot: &MetadataSnapshot) -> Result<()>;

    /// Replace an item's metadata. `note` is kept as an audit message.
    fn update_item(&self, file: &Path, snapshot: &MetadataSnapshot, note: &str) -> Result<()>;
}

/// Builds a [`FileMetadataState`] for each data file.
pub struct ChangeDetector<'a> {
    extractor: &'a dyn MetadataExtractor,
    store: &'a dyn ItemStore,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(extractor: &'a dyn MetadataExtractor, store: &'a dyn ItemStore) -> Self {
        Self { extractor, store }
    }

    pub fn detect(&self, file: &Path) -> Result<FileMetadataState> {
        let current = self.extractor.extract(file)?;
        let stored = self.store.stored_metadata(file)?;

        Ok(FileMetadataState {
            path: file.to_path_buf(),
            current,
            stored,
        })
    }
}

/// Detect and classify every file, in order.
///
/// A file whose metadata cannot be read fails the whole check: an unreadable
/// file has no meaningful freshness.
pub fn check_files<I, P>(
    detector: &ChangeDetector<'_>,
    classifier: &FreshnessClassifier,
    files: I,
) -> Result<MetadataReport>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut report = MetadataReport::default();
    for file in files {
        let state = detector.detect(file.as_ref())?;
        report.push(classifier.classify(&state));
    }

    tracing::info!(
        total = report.total_count(),
        fresh = report.fresh_count(),
        stale = report.stale_count(),
        missing = report.missing_count(),
        breaking = report.breaking_count(),
        "metadata check complete"
    );

    Ok(report)
}

