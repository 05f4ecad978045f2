//! Best-effort ledger updates after repairs
//!
//! Repaired files that are already assets of the current version are
//! re-hashed and published together as one version: a major bump when any of
//! them had a breaking schema change, a patch bump otherwise. Files the ledger
//! does not track are ignored and have no say in either.

use std::path::{Path, PathBuf};

use catalog_backend::{PublishRequest, VersionBackend};
use catalog_versions::{
    Asset, SchemaFingerprint, SchemaInfo, SemanticVersion, Version, parse_semantic_version,
};

use crate::Result;
use crate::status::MetadataStatus;

/// A file whose catalog item was just refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshedFile {
    pub path: PathBuf,
    /// Status the file was classified with before the repair
    pub status: MetadataStatus,
    /// Schema extracted during the repair
    pub schema: Option<SchemaFingerprint>,
}

impl RefreshedFile {
    pub fn new(path: impl Into<PathBuf>, status: MetadataStatus) -> Self {
        Self {
            path: path.into(),
            status,
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: Option<SchemaFingerprint>) -> Self {
        self.schema = schema;
        self
    }

    fn is_breaking(&self) -> bool {
        self.status == MetadataStatus::Breaking
    }
}

/// Records refreshed assets in a collection's ledger through a backend.
pub struct LedgerTracker {
    backend: Box<dyn VersionBackend>,
    collection: PathBuf,
}

impl LedgerTracker {
    pub fn new(backend: Box<dyn VersionBackend>, collection: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            collection: collection.into(),
        }
    }

    /// Track through the backend registered under `name`.
    pub fn from_backend_name(name: &str, collection: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(catalog_backend::resolve(name)?, collection))
    }

    pub fn collection(&self) -> &Path {
        &self.collection
    }

    pub fn backend(&self) -> &dyn VersionBackend {
        self.backend.as_ref()
    }

    /// Re-hash the tracked files among `files` and publish them as one
    /// version.
    ///
    /// The version is breaking, and a major bump, only when a tracked file
    /// that actually changed was classified BREAKING. The published schema is
    /// the one extracted from the refreshed files, preferring a breaking
    /// file's; without one, the current version's schema carries over.
    ///
    /// Returns `None` when there is no current version, none of the files is
    /// tracked, or no tracked file's content changed.
    pub fn record(&self, files: &[RefreshedFile]) -> Result<Option<Version>> {
        let Some(current_name) = self.backend.get_current_version(&self.collection)? else {
            tracing::debug!(
                collection = %self.collection.display(),
                "no current version to track against"
            );
            return Ok(None);
        };

        let versions = self.backend.list_versions(&self.collection)?;
        let Some(current) = versions.iter().find(|v| v.version == current_name) else {
            return Ok(None);
        };

        let mut assets = current.assets.clone();
        let mut refreshed = Vec::new();
        let mut tracked = Vec::new();
        for file in files {
            let key = self.asset_key(&file.path);
            let Some(existing) = current.assets.get(&key) else {
                tracing::debug!(file = %file.path.display(), "file not tracked in ledger");
                continue;
            };

            let asset = Asset::from_file(&file.path, existing.href.clone())?;
            if asset.sha256 != existing.sha256 {
                assets.insert(key.clone(), asset);
                refreshed.push(key);
                tracked.push(file);
            }
        }

        if refreshed.is_empty() {
            return Ok(None);
        }

        let breaking = tracked.iter().any(|f| f.is_breaking());
        let next = next_version(&versions, &current_name, breaking)?;
        let mut request = PublishRequest::new(next.to_string(), assets)
            .breaking(breaking)
            .with_message(format!("Refresh {}", refreshed.join(", ")));
        request.schema = match refreshed_schema(&tracked) {
            Some((file, fingerprint)) => {
                let kind = match &current.schema {
                    Some(info) => info.kind.clone(),
                    None => schema_kind(&file.path),
                };
                Some(SchemaInfo::new(kind, fingerprint.clone()))
            }
            None => current.schema.clone(),
        };

        let published = self.backend.publish(&self.collection, request)?;
        tracing::info!(
            collection = %self.collection.display(),
            version = %published.version,
            assets = refreshed.len(),
            breaking,
            "recorded refreshed assets"
        );
        Ok(Some(published))
    }

    /// Ledger key for a file: its path relative to the collection, with `/`
    /// separators, or its bare file name when outside the collection.
    fn asset_key(&self, file: &Path) -> String {
        match file.strip_prefix(&self.collection) {
            Ok(relative) => relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Schema of the first breaking file that reported one, else of the first
/// file that did.
fn refreshed_schema<'f>(
    files: &[&'f RefreshedFile],
) -> Option<(&'f RefreshedFile, &'f SchemaFingerprint)> {
    let with_schema = |f: &&'f RefreshedFile| {
        let f: &'f RefreshedFile = *f;
        f.schema.as_ref().map(|s| (f, s))
    };
    files
        .iter()
        .filter(|f| f.is_breaking())
        .find_map(with_schema)
        .or_else(|| files.iter().find_map(with_schema))
}

/// Format tag for a schema first seen on `file`: its extension.
fn schema_kind(file: &Path) -> String {
    file.extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Major bump when breaking, patch bump otherwise, of the highest version by
/// precedence.
fn next_version(versions: &[Version], fallback: &str, breaking: bool) -> Result<SemanticVersion> {
    let highest = versions
        .iter()
        .max_by_key(|v| parse_semantic_version(&v.version))
        .map(|v| v.version.as_str())
        .unwrap_or(fallback);
    let highest = SemanticVersion::parse(highest)?;
    let next = if breaking {
        highest.bump_major()?
    } else {
        highest.bump_patch()?
    };
    Ok(next)
}
