//! In-memory builders for assets and histories.

use std::collections::BTreeMap;

use catalog_versions::{Asset, VersionHistory, append};

/// Assets keyed by filename, each with the given checksum and an href of
/// `./<name>`.
pub fn assets(entries: &[(&str, &str)]) -> BTreeMap<String, Asset> {
    entries
        .iter()
        .map(|(name, sha)| {
            (
                name.to_string(),
                Asset::new(*sha, sha.len() as u64, format!("./{}", name)),
            )
        })
        .collect()
}

/// A history with one non-breaking version per entry, appended in order.
///
/// Each version carries a single `data.parquet` asset whose checksum is the
/// version string, so consecutive versions always differ.
pub fn history(versions: &[&str]) -> VersionHistory {
    versions.iter().fold(VersionHistory::new(), |history, version| {
        append(
            &history,
            version,
            assets(&[("data.parquet", version)]),
            false,
            None,
            None,
        )
    })
}
