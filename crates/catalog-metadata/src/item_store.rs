//! JSON sidecar catalog items
//!
//! Each data file `roads.parquet` gets an item `roads.parquet.item.json` in
//! the same directory. Items are written through the atomic writer, so every
//! file's repair commits independently.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::detector::ItemStore;
use crate::snapshot::MetadataSnapshot;
use crate::{Error, Result};

/// Suffix appended to a data file's name to form its item's name.
pub const ITEM_SUFFIX: &str = ".item.json";

/// On-disk form of a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Name of the described data file
    pub file: String,
    #[serde(flatten)]
    pub metadata: MetadataSnapshot,
    pub updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// [`ItemStore`] keeping one JSON sidecar per data file.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonItemStore;

impl JsonItemStore {
    pub fn new() -> Self {
        Self
    }

    /// Sidecar location for `file`.
    pub fn item_path(file: &Path) -> PathBuf {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        file.with_file_name(format!("{}{}", name, ITEM_SUFFIX))
    }

    /// Read the full item for `file`, if one exists.
    pub fn read_item(&self, file: &Path) -> Result<Option<CatalogItem>> {
        let path = Self::item_path(file);
        let content = match catalog_fs::read_text(&path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::item(&path, e.to_string()))
    }

    fn write_item(&self, file: &Path, snapshot: &MetadataSnapshot, note: Option<&str>) -> Result<()> {
        let path = Self::item_path(file);
        let item = CatalogItem {
            file: file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            metadata: snapshot.clone(),
            updated: Utc::now().trunc_subsecs(0),
            note: note.map(str::to_string),
        };

        let mut content = serde_json::to_string_pretty(&item)?;
        content.push('\n');
        catalog_fs::write_text(&path, &content)?;

        tracing::debug!(item = %path.display(), "wrote catalog item");
        Ok(())
    }
}

impl ItemStore for JsonItemStore {
    fn stored_metadata(&self, file: &Path) -> Result<Option<MetadataSnapshot>> {
        Ok(self.read_item(file)?.map(|item| item.metadata))
    }

    fn create_item(&self, file: &Path, snapshot: &MetadataSnapshot) -> Result<()> {
        self.write_item(file, snapshot, None)
    }

    fn update_item(&self, file: &Path, snapshot: &MetadataSnapshot, note: &str) -> Result<()> {
        self.write_item(file, snapshot, Some(note))
    }
}
