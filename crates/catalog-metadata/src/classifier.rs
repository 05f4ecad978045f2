//! Tiered freshness classification
//!
//! Tiers run cheapest first:
//!
//! 1. **Existence**: no stored item means MISSING.
//! 2. **Timestamp**: equal mtimes short-circuit to FRESH when mtimes are
//!    trusted. A differing or absent mtime is tagged and checking continues.
//! 3. **Heuristic**: bounding box and feature count. A mismatch, or a value
//!    the stored item lacks, is STALE.
//! 4. **Schema**: a fingerprint change is STALE or BREAKING as decided by the
//!    injected [`SchemaChangePolicy`].

use crate::policy::{SchemaChangePolicy, StructuralPolicy};
use crate::snapshot::{FileMetadataState, MetadataSnapshot};
use crate::status::{MetadataCheckResult, MetadataStatus};

/// Default absolute tolerance for each bounding-box component.
pub const DEFAULT_BBOX_TOLERANCE: f64 = 1e-9;

/// Classifies a [`FileMetadataState`] into a [`MetadataStatus`].
#[derive(Debug)]
pub struct FreshnessClassifier {
    bbox_tolerance: f64,
    trust_mtime: bool,
    policy: Box<dyn SchemaChangePolicy>,
}

impl Default for FreshnessClassifier {
    fn default() -> Self {
        Self {
            bbox_tolerance: DEFAULT_BBOX_TOLERANCE,
            trust_mtime: true,
            policy: Box::new(StructuralPolicy),
        }
    }
}

impl FreshnessClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bbox_tolerance(mut self, tolerance: f64) -> Self {
        self.bbox_tolerance = tolerance;
        self
    }

    /// When false, equal mtimes no longer short-circuit and every tier runs.
    pub fn with_trust_mtime(mut self, trust: bool) -> Self {
        self.trust_mtime = trust;
        self
    }

    pub fn with_policy(self, policy: impl SchemaChangePolicy + 'static) -> Self {
        self.with_boxed_policy(Box::new(policy))
    }

    pub fn with_boxed_policy(mut self, policy: Box<dyn SchemaChangePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn bbox_tolerance(&self) -> f64 {
        self.bbox_tolerance
    }

    pub fn trust_mtime(&self) -> bool {
        self.trust_mtime
    }

    pub fn policy(&self) -> &dyn SchemaChangePolicy {
        self.policy.as_ref()
    }

    pub fn classify(&self, state: &FileMetadataState) -> MetadataCheckResult {
        let Some(stored) = &state.stored else {
            return MetadataCheckResult::new(
                &state.path,
                MetadataStatus::Missing,
                "No catalog item found",
            )
            .with_fix_hint("create a catalog item for this file");
        };
        let current = &state.current;

        let mut changes = Vec::new();
        let mtime_equal = matches!((stored.mtime, current.mtime), (Some(a), Some(b)) if a == b);
        if mtime_equal && self.trust_mtime {
            return MetadataCheckResult::new(&state.path, MetadataStatus::Fresh, "Up to date");
        }
        if !mtime_equal {
            changes.push("mtime".to_string());
        }

        let heuristics = self.heuristic_changes(stored, current);
        let heuristics_changed = !heuristics.is_empty();
        changes.extend(heuristics);

        let (schema_changed, breaking_detail) = self.schema_change(stored, current);
        if schema_changed {
            changes.push("schema".to_string());
        }

        let result = match breaking_detail {
            Some(detail) => MetadataCheckResult::new(
                &state.path,
                MetadataStatus::Breaking,
                format!("Breaking schema change: {}", detail),
            )
            .with_fix_hint("update the catalog item and publish a breaking version"),
            None if heuristics_changed || schema_changed => {
                let aspects: Vec<&str> = changes
                    .iter()
                    .map(String::as_str)
                    .filter(|c| *c != "mtime")
                    .collect();
                MetadataCheckResult::new(
                    &state.path,
                    MetadataStatus::Stale,
                    format!("Metadata out of date: {} changed", aspects.join(", ")),
                )
                .with_fix_hint("refresh the catalog item")
            }
            None if changes.is_empty() => {
                MetadataCheckResult::new(&state.path, MetadataStatus::Fresh, "Up to date")
            }
            None => MetadataCheckResult::new(
                &state.path,
                MetadataStatus::Fresh,
                "File touched but metadata unchanged",
            ),
        };

        tracing::debug!(
            path = %state.path.display(),
            status = %result.status,
            changes = ?changes,
            "classified file"
        );

        result.with_changes(changes)
    }

    /// Heuristic tags. A value missing from the stored item always counts as
    /// changed; a value the extractor did not report is not compared.
    fn heuristic_changes(&self, stored: &MetadataSnapshot, current: &MetadataSnapshot) -> Vec<String> {
        let mut changes = Vec::new();

        let bbox_changed = match (&stored.bbox, &current.bbox) {
            (None, _) => true,
            (Some(old), Some(new)) => !old.approx_eq(new, self.bbox_tolerance),
            (Some(_), None) => false,
        };
        if bbox_changed {
            changes.push("bbox".to_string());
        }

        let count_changed = match (stored.feature_count, current.feature_count) {
            (None, _) => true,
            (Some(old), Some(new)) => old != new,
            (Some(_), None) => false,
        };
        if count_changed {
            changes.push("feature_count".to_string());
        }

        changes
    }

    /// Whether the schema changed, and a description when the change breaks.
    fn schema_change(
        &self,
        stored: &MetadataSnapshot,
        current: &MetadataSnapshot,
    ) -> (bool, Option<String>) {
        match (&stored.schema, &current.schema) {
            (Some(old), Some(new)) if !old.matches(new) => {
                if self.policy.is_breaking(old, new) {
                    (true, Some(old.diff(new).to_string()))
                } else {
                    (true, None)
                }
            }
            (None, Some(_)) | (Some(_), None) => (true, None),
            _ => (false, None),
        }
    }
}
