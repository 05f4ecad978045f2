//! Shared helpers for catalog-metadata integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use catalog_metadata::{BoundingBox, Error, MetadataExtractor, MetadataSnapshot, Result};
use catalog_versions::SchemaFingerprint;

/// Extractor returning canned snapshots, failing for selected files.
#[derive(Default)]
pub struct FakeExtractor {
    snapshots: RefCell<HashMap<PathBuf, MetadataSnapshot>>,
    failing: RefCell<HashSet<PathBuf>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, file: &Path, snapshot: MetadataSnapshot) {
        self.snapshots
            .borrow_mut()
            .insert(file.to_path_buf(), snapshot);
    }

    pub fn fail_on(&self, file: &Path) {
        self.failing.borrow_mut().insert(file.to_path_buf());
    }
}

impl MetadataExtractor for FakeExtractor {
    fn extract(&self, file: &Path) -> Result<MetadataSnapshot> {
        if self.failing.borrow().contains(file) {
            return Err(Error::extraction(file, "corrupt geometry column"));
        }
        self.snapshots
            .borrow()
            .get(file)
            .cloned()
            .ok_or_else(|| Error::extraction(file, "no snapshot configured"))
    }
}

pub fn schema(columns: &[(&str, &str)]) -> SchemaFingerprint {
    SchemaFingerprint::new(columns.iter().copied())
}

/// A fully populated snapshot: 100 features in a 10x10 box with an id/name schema.
pub fn snapshot(mtime: f64) -> MetadataSnapshot {
    MetadataSnapshot::default()
        .with_mtime(mtime)
        .with_bbox(BoundingBox::new(0.0, 0.0, 10.0, 10.0))
        .with_feature_count(100)
        .with_schema(schema(&[("id", "int64"), ("name", "string")]))
}

/// Every file under `root` with its bytes, sorted by path.
pub fn tree_bytes(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut entries: Vec<(PathBuf, Vec<u8>)> = std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file())
        .map(|p| {
            let bytes = std::fs::read(&p).unwrap();
            (p, bytes)
        })
        .collect();
    entries.sort();
    entries
}
