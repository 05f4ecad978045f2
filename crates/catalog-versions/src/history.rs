//! Pure history updates
//!
//! Each function takes the history by reference and returns a new value. The
//! input is never touched, which keeps the append-only guarantee structural:
//! a caller holding a `VersionHistory` can rely on it not changing underneath.

use std::collections::BTreeMap;

use chrono::{SubsecRound, Utc};

use crate::model::{Asset, SchemaInfo, Version, VersionHistory};
use crate::precedence::SemanticVersion;
use crate::{Error, Result};

/// Append a new version and point `current_version` at it.
///
/// `changes` is computed against the previous (last) version's assets; when
/// the history is empty every new filename counts as changed. The creation
/// timestamp is the current UTC instant truncated to whole seconds.
pub fn append(
    history: &VersionHistory,
    version: &str,
    assets: BTreeMap<String, Asset>,
    breaking: bool,
    schema: Option<SchemaInfo>,
    message: Option<String>,
) -> VersionHistory {
    let changes = match history.latest() {
        Some(previous) => compute_changes(&previous.assets, &assets),
        None => assets.keys().cloned().collect(),
    };

    let entry = Version {
        version: version.to_string(),
        created: Utc::now().trunc_subsecs(0),
        breaking,
        message,
        schema,
        assets,
        changes,
    };

    let mut versions = history.versions().to_vec();
    versions.push(entry);

    VersionHistory::from_parts(
        history.spec_version().to_string(),
        Some(version.to_string()),
        versions,
    )
}

/// Filenames that are new in `next` or whose checksum differs from `previous`.
///
/// Files dropped from `next` are not listed. Output is sorted by filename.
pub fn compute_changes(
    previous: &BTreeMap<String, Asset>,
    next: &BTreeMap<String, Asset>,
) -> Vec<String> {
    next.iter()
        .filter(|(name, asset)| {
            previous
                .get(*name)
                .is_none_or(|old| old.sha256 != asset.sha256)
        })
        .map(|(name, _)| name.clone())
        .collect()
}

/// Drop all but the newest `keep` versions.
///
/// The version named by `current_version` is always retained even when it
/// falls outside the window. Returns the pruned history and the removed
/// versions, oldest first.
///
/// # Errors
///
/// Returns [`Error::InvalidPrune`] when `keep` is zero.
pub fn prune(history: &VersionHistory, keep: usize) -> Result<(VersionHistory, Vec<Version>)> {
    if keep == 0 {
        return Err(Error::InvalidPrune {
            reason: "must keep at least one version".to_string(),
        });
    }

    let cutoff = history.len().saturating_sub(keep);
    let current = history.current_version();

    let (kept, removed): (Vec<(usize, &Version)>, Vec<(usize, &Version)>) = history
        .versions()
        .iter()
        .enumerate()
        .partition(|(i, v)| *i >= cutoff || Some(v.version.as_str()) == current);

    let kept = kept.into_iter().map(|(_, v)| v.clone()).collect();
    let removed = removed.into_iter().map(|(_, v)| v.clone()).collect();

    let pruned = VersionHistory::from_parts(
        history.spec_version().to_string(),
        history.current_version().map(str::to_string),
        kept,
    );

    Ok((pruned, removed))
}

/// Restore a historical version by appending a copy of it.
///
/// History is never rewritten: the restored assets and schema are appended
/// under a new version string, the patch bump of the highest existing version.
/// The new version is marked breaking when the restored schema differs from
/// the latest version's schema.
///
/// # Errors
///
/// - [`Error::VersionNotFound`] if `target` is not in the history
/// - [`Error::InvalidVersion`] if the highest existing version cannot be
///   parsed, since no successor can be derived from it
pub fn rollback(history: &VersionHistory, target: &str) -> Result<VersionHistory> {
    let restored = history.get(target).ok_or_else(|| Error::VersionNotFound {
        version: target.to_string(),
    })?;

    let highest = history.highest().ok_or_else(|| Error::VersionNotFound {
        version: target.to_string(),
    })?;
    let next = SemanticVersion::parse(&highest.version)?.bump_patch()?;

    let breaking = match (
        restored.schema_hash(),
        history.latest().and_then(|v| v.schema_hash()),
    ) {
        (Some(restored_hash), Some(latest_hash)) => restored_hash != latest_hash,
        _ => false,
    };

    tracing::info!(rollback_to = target, new_version = %next, breaking, "rolling back");

    Ok(append(
        history,
        &next.to_string(),
        restored.assets.clone(),
        breaking,
        restored.schema.clone(),
        Some(format!("Rollback to {}", target)),
    ))
}
