//! Built-in backend over the atomic `versions.json` ledger

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use catalog_versions::{
    LEDGER_FILENAME, SemanticVersion, Version, VersionHistory, parse_semantic_version,
};

use crate::protocol::{DriftReport, LedgerPointer, PublishRequest, VersionBackend};
use crate::{Error, Result};

/// Backend storing each collection's history in `<collection>/versions.json`.
///
/// Every successful read or write records the observed ledger pointer for
/// that collection. [`VersionBackend::check_drift`] compares that baseline
/// with the file on disk.
#[derive(Debug, Default)]
pub struct FileBackend {
    baselines: Mutex<HashMap<PathBuf, LedgerPointer>>,
}

impl FileBackend {
    /// Registry name of the built-in backend.
    pub const NAME: &'static str = "file";

    pub fn new() -> Self {
        Self::default()
    }

    /// Location of the ledger inside `collection`.
    pub fn ledger_path(collection: &Path) -> PathBuf {
        collection.join(LEDGER_FILENAME)
    }

    /// Read the ledger, treating an absent file as `None`.
    fn read_optional(collection: &Path) -> Result<Option<VersionHistory>> {
        match catalog_versions::read(&Self::ledger_path(collection)) {
            Ok(history) => Ok(Some(history)),
            Err(catalog_versions::Error::MissingLedger { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn load(&self, collection: &Path) -> Result<Option<VersionHistory>> {
        let history = Self::read_optional(collection)?;
        if let Some(history) = &history {
            self.observe(collection, history);
        }
        Ok(history)
    }

    fn load_required(&self, collection: &Path) -> Result<VersionHistory> {
        let history = catalog_versions::read(&Self::ledger_path(collection))?;
        self.observe(collection, &history);
        Ok(history)
    }

    fn store(&self, collection: &Path, history: &VersionHistory) -> Result<()> {
        catalog_versions::write(&Self::ledger_path(collection), history)?;
        self.observe(collection, history);
        Ok(())
    }

    fn observe(&self, collection: &Path, history: &VersionHistory) {
        let mut baselines = self.baselines.lock().unwrap_or_else(|e| e.into_inner());
        baselines.insert(collection.to_path_buf(), pointer_of(history));
    }

    fn baseline(&self, collection: &Path) -> Option<LedgerPointer> {
        let baselines = self.baselines.lock().unwrap_or_else(|e| e.into_inner());
        baselines.get(collection).cloned()
    }
}

fn pointer_of(history: &VersionHistory) -> LedgerPointer {
    LedgerPointer {
        current_version: history.current_version().map(str::to_string),
        version_count: history.len(),
    }
}

/// The last element of a history that was just appended to.
fn appended(history: &VersionHistory, version: &str) -> Result<Version> {
    history.latest().cloned().ok_or_else(|| {
        Error::Versions(catalog_versions::Error::VersionNotFound {
            version: version.to_string(),
        })
    })
}

impl VersionBackend for FileBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn get_current_version(&self, collection: &Path) -> Result<Option<String>> {
        Ok(self
            .load(collection)?
            .and_then(|h| h.current_version().map(str::to_string)))
    }

    fn list_versions(&self, collection: &Path) -> Result<Vec<Version>> {
        Ok(self
            .load(collection)?
            .map(|h| h.versions().to_vec())
            .unwrap_or_default())
    }

    fn publish(&self, collection: &Path, request: PublishRequest) -> Result<Version> {
        let history = self.load(collection)?.unwrap_or_default();
        let requested = SemanticVersion::parse(&request.version)?;

        if let Some(highest) = history.highest() {
            let latest = parse_semantic_version(&highest.version);
            if requested.as_tuple() <= latest || history.contains(&request.version) {
                return Err(catalog_versions::Error::VersionConflict {
                    version: request.version,
                    latest: highest.version.clone(),
                }
                .into());
            }
        }

        let version = request.version.clone();
        let next = catalog_versions::append(
            &history,
            &request.version,
            request.assets,
            request.breaking,
            request.schema,
            request.message,
        );
        self.store(collection, &next)?;

        let published = appended(&next, &version)?;
        tracing::info!(
            collection = %collection.display(),
            version = %published.version,
            breaking = published.breaking,
            changes = published.changes.len(),
            "published version"
        );
        Ok(published)
    }

    fn rollback(&self, collection: &Path, target: &str) -> Result<Version> {
        let history = self.load_required(collection)?;
        let next = catalog_versions::rollback(&history, target)?;
        self.store(collection, &next)?;
        appended(&next, target)
    }

    fn prune(&self, collection: &Path, keep: usize, dry_run: bool) -> Result<Vec<Version>> {
        let history = self.load_required(collection)?;
        let (pruned, removed) = catalog_versions::prune(&history, keep)?;

        if dry_run {
            tracing::info!(
                collection = %collection.display(),
                keep,
                would_remove = removed.len(),
                "[dry-run] Would prune versions"
            );
            return Ok(removed);
        }

        if !removed.is_empty() {
            self.store(collection, &pruned)?;
        }
        tracing::info!(
            collection = %collection.display(),
            keep,
            removed = removed.len(),
            "pruned versions"
        );
        Ok(removed)
    }

    fn check_drift(&self, collection: &Path) -> Result<DriftReport> {
        let actual = Self::read_optional(collection)?.map(|h| pointer_of(&h));
        let report = DriftReport::new(self.baseline(collection), actual);

        if report.has_drift {
            tracing::warn!(
                collection = %collection.display(),
                expected = ?report.expected,
                actual = ?report.actual,
                "ledger changed outside this backend"
            );
        }
        Ok(report)
    }
}
