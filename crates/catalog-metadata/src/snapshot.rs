//! Metadata snapshots compared by the freshness classifier

use std::path::PathBuf;

use catalog_versions::SchemaFingerprint;
use serde::{Deserialize, Serialize};

/// Spatial extent as `[min_x, min_y, max_x, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Each component compared independently against an absolute tolerance.
    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}

/// The metadata facts compared between a data file and its catalog item.
///
/// Every field is optional: extractors report what they can, and an item
/// written by an older tool may lack fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    /// Modification time, seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    /// Feature count for vector data, pixel count for rasters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaFingerprint>,
}

impl MetadataSnapshot {
    pub fn with_mtime(mut self, mtime: f64) -> Self {
        self.mtime = Some(mtime);
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_feature_count(mut self, count: u64) -> Self {
        self.feature_count = Some(count);
        self
    }

    pub fn with_schema(mut self, schema: SchemaFingerprint) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// A data file's current metadata paired with what the catalog has stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadataState {
    pub path: PathBuf,
    pub current: MetadataSnapshot,
    /// `None` when the catalog has no item for this file
    pub stored: Option<MetadataSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_serializes_as_array() {
        let bbox = BoundingBox::new(-1.0, -2.0, 3.0, 4.5);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[-1.0,-2.0,3.0,4.5]");
        assert_eq!(serde_json::from_str::<BoundingBox>(&json).unwrap(), bbox);
    }

    #[test]
    fn bbox_tolerance_is_per_component() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(0.0, 0.0, 1.0 + 5e-10, 1.0);
        let c = BoundingBox::new(0.0, 0.0, 1.0, 1.0 + 1e-6);

        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&c, 1e-9));
    }

    #[test]
    fn empty_snapshot_serializes_to_empty_object() {
        let json = serde_json::to_string(&MetadataSnapshot::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
