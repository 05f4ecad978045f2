//! Ledger data model
//!
//! All types here are plain values with structural equality. A
//! [`VersionHistory`] exposes no mutating methods: new histories are produced
//! by the functions in [`crate::history`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, SPEC_VERSION};

/// A content-addressed file tracked within a version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Hex-encoded SHA-256 of the file contents
    pub sha256: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Location reference, usually relative to the collection directory
    pub href: String,
    /// Path of the file the asset was produced from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    /// Modification time of the source file, seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_mtime: Option<f64>,
}

impl Asset {
    pub fn new(sha256: impl Into<String>, size_bytes: u64, href: impl Into<String>) -> Self {
        Self {
            sha256: sha256.into(),
            size_bytes,
            href: href.into(),
            source_path: None,
            source_mtime: None,
        }
    }

    /// Attach provenance information.
    pub fn with_source(mut self, source_path: impl Into<String>, source_mtime: f64) -> Self {
        self.source_path = Some(source_path.into());
        self.source_mtime = Some(source_mtime);
        self
    }

    /// Build an asset by hashing a file on disk.
    ///
    /// Records the file's own path and modification time as provenance.
    pub fn from_file(path: &Path, href: impl Into<String>) -> Result<Self> {
        let sha256 = catalog_fs::compute_file_checksum(path)?;
        let size_bytes = std::fs::metadata(path)
            .map_err(|e| catalog_fs::Error::io(path, e))?
            .len();
        let mtime = catalog_fs::mtime_secs(path)?;

        Ok(Self::new(sha256, size_bytes, href).with_source(path.display().to_string(), mtime))
    }
}

/// Hash-based summary of a tabular schema.
///
/// The hash is computed from the ordered `name:type` pairs, so two
/// fingerprints compare equal in O(1) by hash alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFingerprint {
    /// Column names in schema order
    pub columns: Vec<String>,
    /// Column name to type tag
    pub types: BTreeMap<String, String>,
    /// Hex SHA-256 of the canonical column listing
    pub hash: String,
}

impl SchemaFingerprint {
    /// Build a fingerprint from `(column, type)` pairs in schema order.
    pub fn new<I, N, T>(columns: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let mut names = Vec::new();
        let mut types = BTreeMap::new();
        let mut canonical = String::new();

        for (name, type_tag) in columns {
            let name = name.into();
            let type_tag = type_tag.into();
            canonical.push_str(&name);
            canonical.push(':');
            canonical.push_str(&type_tag);
            canonical.push('\n');
            types.insert(name.clone(), type_tag);
            names.push(name);
        }

        Self {
            columns: names,
            types,
            hash: catalog_fs::compute_bytes_checksum(canonical.as_bytes()),
        }
    }

    /// Whether two fingerprints describe the same schema.
    pub fn matches(&self, other: &SchemaFingerprint) -> bool {
        self.hash == other.hash
    }

    /// Structural difference from `self` (old) to `other` (new).
    pub fn diff(&self, other: &SchemaFingerprint) -> SchemaDiff {
        let old: BTreeSet<&String> = self.columns.iter().collect();
        let new: BTreeSet<&String> = other.columns.iter().collect();

        let added = other
            .columns
            .iter()
            .filter(|c| !old.contains(c))
            .cloned()
            .collect();
        let removed = self
            .columns
            .iter()
            .filter(|c| !new.contains(c))
            .cloned()
            .collect();
        let retyped = self
            .columns
            .iter()
            .filter(|c| new.contains(c) && self.types.get(*c) != other.types.get(*c))
            .cloned()
            .collect();

        SchemaDiff {
            added,
            removed,
            retyped,
        }
    }
}

/// Column-level difference between two schema fingerprints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub retyped: Vec<String>,
}

impl SchemaDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.retyped.is_empty()
    }

    /// True when the only change is new columns.
    pub fn is_additive(&self) -> bool {
        self.removed.is_empty() && self.retyped.is_empty()
    }
}

impl std::fmt::Display for SchemaDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if !self.added.is_empty() {
            parts.push(format!("added {}", self.added.join(", ")));
        }
        if !self.removed.is_empty() {
            parts.push(format!("removed {}", self.removed.join(", ")));
        }
        if !self.retyped.is_empty() {
            parts.push(format!("retyped {}", self.retyped.join(", ")));
        }
        if parts.is_empty() {
            write!(f, "column order changed")
        } else {
            write!(f, "{}", parts.join("; "))
        }
    }
}

/// Schema recorded with a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// Format tag, e.g. `geoparquet` or `cog`
    #[serde(rename = "type")]
    pub kind: String,
    pub fingerprint: SchemaFingerprint,
}

impl SchemaInfo {
    pub fn new(kind: impl Into<String>, fingerprint: SchemaFingerprint) -> Self {
        Self {
            kind: kind.into(),
            fingerprint,
        }
    }
}

/// An immutable snapshot of a collection's assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// Semantic version string (`major.minor.patch`)
    pub version: String,
    /// UTC creation instant
    #[serde(with = "timestamp")]
    pub created: DateTime<Utc>,
    /// Whether consumers of the previous version may break
    pub breaking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaInfo>,
    /// Filename to asset
    pub assets: BTreeMap<String, Asset>,
    /// Filenames whose content differs from the previous version
    pub changes: Vec<String>,
}

impl Version {
    /// Look up one tracked asset.
    pub fn asset(&self, filename: &str) -> Option<&Asset> {
        self.assets.get(filename)
    }

    /// Schema fingerprint hash, if a schema was recorded.
    pub fn schema_hash(&self) -> Option<&str> {
        self.schema.as_ref().map(|s| s.fingerprint.hash.as_str())
    }
}

/// The append-only version ledger of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionHistory {
    spec_version: String,
    current_version: Option<String>,
    versions: Vec<Version>,
}

impl VersionHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            current_version: None,
            versions: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        spec_version: String,
        current_version: Option<String>,
        versions: Vec<Version>,
    ) -> Self {
        Self {
            spec_version,
            current_version,
            versions,
        }
    }

    /// Ledger format tag.
    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    /// Version string the current pointer names, if any.
    pub fn current_version(&self) -> Option<&str> {
        self.current_version.as_deref()
    }

    /// All versions, oldest first.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// The version the current pointer names.
    pub fn current(&self) -> Option<&Version> {
        let current = self.current_version.as_deref()?;
        self.get(current)
    }

    /// The most recently appended version.
    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Find a version by its version string.
    ///
    /// Searches newest first, so a repeated version string resolves to its
    /// latest occurrence.
    pub fn get(&self, version: &str) -> Option<&Version> {
        self.versions.iter().rev().find(|v| v.version == version)
    }

    pub fn contains(&self, version: &str) -> bool {
        self.get(version).is_some()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Versions ordered by semantic-version precedence, ties kept in append order.
    pub fn sorted_by_precedence(&self) -> Vec<&Version> {
        let mut sorted: Vec<&Version> = self.versions.iter().collect();
        sorted.sort_by_key(|v| crate::parse_semantic_version(&v.version));
        sorted
    }

    /// The version with the highest precedence.
    pub fn highest(&self) -> Option<&Version> {
        self.sorted_by_precedence().last().copied()
    }
}

impl Default for VersionHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// RFC3339 timestamps, `Z`-suffixed, fractional seconds only when present.
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
    }
}
