//! The version backend protocol
//!
//! Every backend exposes the same six operations over a collection directory.
//! The trait is checked at compile time; [`missing_operations`] is the
//! runtime check applied to externally registered backends that declare a
//! reduced operation set.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use catalog_versions::{Asset, SchemaInfo, Version};
use serde::{Deserialize, Serialize};

use crate::Result;

/// One operation of the backend protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendOperation {
    GetCurrentVersion,
    ListVersions,
    Publish,
    Rollback,
    Prune,
    CheckDrift,
}

impl BackendOperation {
    /// Every operation a conforming backend must expose.
    pub const ALL: [BackendOperation; 6] = [
        BackendOperation::GetCurrentVersion,
        BackendOperation::ListVersions,
        BackendOperation::Publish,
        BackendOperation::Rollback,
        BackendOperation::Prune,
        BackendOperation::CheckDrift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetCurrentVersion => "get_current_version",
            Self::ListVersions => "list_versions",
            Self::Publish => "publish",
            Self::Rollback => "rollback",
            Self::Prune => "prune",
            Self::CheckDrift => "check_drift",
        }
    }
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to publish a new version.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub version: String,
    pub assets: BTreeMap<String, Asset>,
    pub breaking: bool,
    pub schema: Option<SchemaInfo>,
    pub message: Option<String>,
}

impl PublishRequest {
    pub fn new(version: impl Into<String>, assets: BTreeMap<String, Asset>) -> Self {
        Self {
            version: version.into(),
            assets,
            breaking: false,
            schema: None,
            message: None,
        }
    }

    pub fn breaking(mut self, breaking: bool) -> Self {
        self.breaking = breaking;
        self
    }

    pub fn with_schema(mut self, schema: SchemaInfo) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Ledger state as seen by one backend instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPointer {
    /// Value of `current_version`
    pub current_version: Option<String>,
    /// Number of versions in the history
    pub version_count: usize,
}

/// Result of comparing the expected ledger state with the persisted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    /// What this backend last read or wrote; `None` if it never touched the ledger
    pub expected: Option<LedgerPointer>,
    /// What is on disk now; `None` if no ledger exists
    pub actual: Option<LedgerPointer>,
    pub has_drift: bool,
}

impl DriftReport {
    pub fn new(expected: Option<LedgerPointer>, actual: Option<LedgerPointer>) -> Self {
        let has_drift = match &expected {
            Some(expected) => actual.as_ref() != Some(expected),
            None => false,
        };
        Self {
            expected,
            actual,
            has_drift,
        }
    }
}

/// Persistence backend for a collection's version ledger.
///
/// Implementations must be safe to share across threads, though every
/// operation is synchronous and the built-in backend assumes a single writer.
pub trait VersionBackend: Send + Sync {
    /// Registry name of this backend.
    fn name(&self) -> &str;

    /// Operations this backend actually implements.
    ///
    /// A conforming backend returns all of [`BackendOperation::ALL`]. The
    /// registry refuses instances that report fewer.
    fn supported_operations(&self) -> &[BackendOperation] {
        &BackendOperation::ALL
    }

    /// The version `current_version` points at, or `None` for an empty or
    /// absent ledger.
    fn get_current_version(&self, collection: &Path) -> Result<Option<String>>;

    /// All versions, oldest first.
    fn list_versions(&self, collection: &Path) -> Result<Vec<Version>>;

    /// Append a new version and make it current.
    ///
    /// # Errors
    ///
    /// The version must be a valid `major.minor.patch` string that sorts after
    /// every existing version.
    fn publish(&self, collection: &Path, request: PublishRequest) -> Result<Version>;

    /// Restore an older version by appending a copy of it.
    fn rollback(&self, collection: &Path, target: &str) -> Result<Version>;

    /// Remove all but the newest `keep` versions. Returns the removed versions.
    ///
    /// With `dry_run`, nothing is written and the versions that would be
    /// removed are returned.
    fn prune(&self, collection: &Path, keep: usize, dry_run: bool) -> Result<Vec<Version>>;

    /// Compare what this instance expects with what is persisted.
    ///
    /// Detection only: never blocks or repairs a concurrent writer.
    fn check_drift(&self, collection: &Path) -> Result<DriftReport>;
}

/// Protocol operations the backend does not declare, in protocol order.
pub fn missing_operations(backend: &dyn VersionBackend) -> Vec<BackendOperation> {
    let supported = backend.supported_operations();
    BackendOperation::ALL
        .into_iter()
        .filter(|op| !supported.contains(op))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(current: &str, count: usize) -> LedgerPointer {
        LedgerPointer {
            current_version: Some(current.to_string()),
            version_count: count,
        }
    }

    #[test]
    fn no_baseline_means_no_drift() {
        let report = DriftReport::new(None, Some(pointer("1.0.0", 1)));
        assert!(!report.has_drift);
    }

    #[test]
    fn matching_state_is_not_drift() {
        let report = DriftReport::new(Some(pointer("1.0.0", 1)), Some(pointer("1.0.0", 1)));
        assert!(!report.has_drift);
    }

    #[test]
    fn moved_pointer_is_drift() {
        let report = DriftReport::new(Some(pointer("1.0.0", 1)), Some(pointer("1.1.0", 2)));
        assert!(report.has_drift);
    }

    #[test]
    fn deleted_ledger_is_drift() {
        let report = DriftReport::new(Some(pointer("1.0.0", 1)), None);
        assert!(report.has_drift);
    }

    #[test]
    fn operation_names_are_snake_case() {
        let names: Vec<&str> = BackendOperation::ALL.iter().map(|op| op.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "get_current_version",
                "list_versions",
                "publish",
                "rollback",
                "prune",
                "check_drift"
            ]
        );
    }
}
