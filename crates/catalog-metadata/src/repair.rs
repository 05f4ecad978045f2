//! Repair orchestration
//!
//! Each classified file maps to one [`FixAction`]. Files are repaired
//! independently: a failure on one file is recorded and the batch continues.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detector::{ItemStore, MetadataExtractor};
use crate::snapshot::MetadataSnapshot;
use crate::status::{MetadataCheckResult, MetadataStatus};
use crate::tracking::{LedgerTracker, RefreshedFile};

/// What the orchestrator does for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixAction {
    Create,
    Update,
    Skip,
}

impl FixAction {
    /// The single decision point shared by dry-run and live runs.
    pub fn for_status(status: MetadataStatus) -> Self {
        match status {
            MetadataStatus::Missing => Self::Create,
            MetadataStatus::Stale | MetadataStatus::Breaking => Self::Update,
            MetadataStatus::Fresh => Self::Skip,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for FixAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixOptions {
    /// Decide actions without touching the filesystem.
    ///
    /// Messages are prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

impl FixOptions {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Outcome of repairing one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixResult {
    pub path: PathBuf,
    pub action: FixAction,
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
    pub dry_run: bool,
}

impl FixResult {
    fn succeeded(path: &Path, action: FixAction, message: String, dry_run: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            action,
            success: true,
            message,
            error: None,
            dry_run,
        }
    }

    fn failed(path: &Path, action: FixAction, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            action,
            success: false,
            message: format!("Failed to {} catalog item", action),
            error: Some(error),
            dry_run: false,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.action == FixAction::Skip
    }
}

/// Results of a repair pass, one per input check result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixReport {
    pub results: Vec<FixResult>,
    /// Version published by ledger tracking, if any
    pub ledger_version: Option<String>,
    /// Why ledger tracking failed; the repairs themselves still stand
    pub ledger_error: Option<String>,
}

impl FixReport {
    /// Files that required an action.
    pub fn total_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_skipped()).count()
    }

    pub fn success_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.is_skipped() && r.success)
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.is_skipped() && !r.success)
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn failures(&self) -> Vec<&FixResult> {
        self.results
            .iter()
            .filter(|r| !r.is_skipped() && !r.success)
            .collect()
    }
}

/// Applies [`FixAction`]s through an extractor and an item store.
pub struct Repairer<'a> {
    extractor: &'a dyn MetadataExtractor,
    store: &'a dyn ItemStore,
    tracker: Option<&'a LedgerTracker>,
}

impl<'a> Repairer<'a> {
    pub fn new(extractor: &'a dyn MetadataExtractor, store: &'a dyn ItemStore) -> Self {
        Self {
            extractor,
            store,
            tracker: None,
        }
    }

    /// Record refreshed assets in the ledger after each live batch.
    pub fn with_tracker(mut self, tracker: &'a LedgerTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn fix(&self, checks: &[MetadataCheckResult], options: FixOptions) -> FixReport {
        let mut report = FixReport::default();
        let mut refreshed = Vec::new();

        for check in checks {
            let (result, snapshot) = self.fix_one(check, options);
            if let (FixAction::Update, Some(snapshot)) = (result.action, snapshot) {
                let file = RefreshedFile::new(check.path.clone(), check.status);
                refreshed.push(file.with_schema(snapshot.schema));
            }
            report.results.push(result);
        }

        if let Some(tracker) = self.tracker {
            if !refreshed.is_empty() {
                match tracker.record(&refreshed) {
                    Ok(version) => report.ledger_version = version.map(|v| v.version),
                    Err(e) => {
                        tracing::warn!(error = %e, "ledger tracking failed");
                        report.ledger_error = Some(e.to_string());
                    }
                }
            }
        }

        tracing::info!(
            total = report.total_count(),
            success = report.success_count(),
            failure = report.failure_count(),
            skipped = report.skipped_count(),
            dry_run = options.dry_run,
            "repair complete"
        );

        report
    }

    /// The result for one file, with the snapshot written when a live
    /// repair succeeded.
    fn fix_one(
        &self,
        check: &MetadataCheckResult,
        options: FixOptions,
    ) -> (FixResult, Option<MetadataSnapshot>) {
        let action = FixAction::for_status(check.status);
        let path = check.path.as_path();

        if action == FixAction::Skip {
            let result =
                FixResult::succeeded(path, action, "Up to date".to_string(), options.dry_run);
            return (result, None);
        }

        if options.dry_run {
            let result = FixResult::succeeded(
                path,
                action,
                format!("[dry-run] Would {}", describe(action, check)),
                true,
            );
            return (result, None);
        }

        match self.apply(action, check) {
            Ok(snapshot) => {
                tracing::info!(path = %path.display(), action = %action, "repaired catalog item");
                let message = format!("Done: {}", describe(action, check));
                (FixResult::succeeded(path, action, message, false), Some(snapshot))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), action = %action, error = %e, "repair failed");
                (FixResult::failed(path, action, e.to_string()), None)
            }
        }
    }

    fn apply(&self, action: FixAction, check: &MetadataCheckResult) -> crate::Result<MetadataSnapshot> {
        let snapshot = self.extractor.extract(&check.path)?;
        match action {
            FixAction::Create => self.store.create_item(&check.path, &snapshot)?,
            FixAction::Update => {
                self.store
                    .update_item(&check.path, &snapshot, &audit_note(check))?
            }
            FixAction::Skip => {}
        }
        Ok(snapshot)
    }
}

fn describe(action: FixAction, check: &MetadataCheckResult) -> String {
    let path = check.path.display();
    match (action, check.status) {
        (FixAction::Create, _) => format!("create catalog item for {}", path),
        (FixAction::Update, MetadataStatus::Breaking) => {
            format!("update catalog item for {} (breaking schema change)", path)
        }
        _ => format!("update catalog item for {}", path),
    }
}

fn audit_note(check: &MetadataCheckResult) -> String {
    match check.status {
        MetadataStatus::Breaking => format!("BREAKING: {}", check.message),
        _ if check.changes.is_empty() => "refreshed".to_string(),
        _ => format!("refreshed: {}", check.changes.join(", ")),
    }
}
