//! Freshness statuses and check reports

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Freshness of a file's catalog metadata, ordered by severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MetadataStatus {
    /// Catalog metadata matches the data file
    Fresh,
    /// Metadata is outdated but the data is structurally compatible
    Stale,
    /// The catalog has no item for the file
    Missing,
    /// The schema changed incompatibly
    Breaking,
}

impl MetadataStatus {
    /// Numeric severity: FRESH 0, STALE 1, MISSING 2, BREAKING 3.
    pub fn severity(&self) -> u8 {
        match self {
            Self::Fresh => 0,
            Self::Stale => 1,
            Self::Missing => 2,
            Self::Breaking => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Stale => "stale",
            Self::Missing => "missing",
            Self::Breaking => "breaking",
        }
    }
}

impl fmt::Display for MetadataStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataCheckResult {
    pub path: PathBuf,
    pub status: MetadataStatus,
    pub message: String,
    /// Changed aspects: `mtime`, `bbox`, `feature_count`, `schema`
    pub changes: Vec<String>,
    pub fix_hint: Option<String>,
}

impl MetadataCheckResult {
    pub fn new(path: impl Into<PathBuf>, status: MetadataStatus, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status,
            message: message.into(),
            changes: Vec::new(),
            fix_hint: None,
        }
    }

    pub fn with_changes(mut self, changes: Vec<String>) -> Self {
        self.changes = changes;
        self
    }

    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }
}

/// Aggregate of per-file classifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataReport {
    pub results: Vec<MetadataCheckResult>,
}

impl MetadataReport {
    pub fn new(results: Vec<MetadataCheckResult>) -> Self {
        Self { results }
    }

    pub fn push(&mut self, result: MetadataCheckResult) {
        self.results.push(result);
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    pub fn fresh_count(&self) -> usize {
        self.count(MetadataStatus::Fresh)
    }

    pub fn stale_count(&self) -> usize {
        self.count(MetadataStatus::Stale)
    }

    pub fn missing_count(&self) -> usize {
        self.count(MetadataStatus::Missing)
    }

    pub fn breaking_count(&self) -> usize {
        self.count(MetadataStatus::Breaking)
    }

    /// True when every file is fresh. An empty report passes.
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.status == MetadataStatus::Fresh)
    }

    /// Non-fresh results, most severe first. Ties keep input order.
    pub fn issues(&self) -> Vec<&MetadataCheckResult> {
        let mut issues: Vec<_> = self
            .results
            .iter()
            .filter(|r| r.status != MetadataStatus::Fresh)
            .collect();
        issues.sort_by(|a, b| b.status.cmp(&a.status));
        issues
    }

    pub fn by_status(&self, status: MetadataStatus) -> Vec<&MetadataCheckResult> {
        self.results.iter().filter(|r| r.status == status).collect()
    }

    /// Most severe status in the report, `Fresh` when empty.
    pub fn worst_status(&self) -> MetadataStatus {
        self.results
            .iter()
            .map(|r| r.status)
            .max()
            .unwrap_or(MetadataStatus::Fresh)
    }

    fn count(&self, status: MetadataStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}
