//! Metadata freshness for catalog collections
//!
//! Detects when a collection's catalog items have drifted from the data files
//! they describe, and repairs them.
//!
//! - [`ChangeDetector`] pairs each file's current metadata (from a
//!   [`MetadataExtractor`]) with the stored item (from an [`ItemStore`])
//! - [`FreshnessClassifier`] assigns a [`MetadataStatus`] in four tiers:
//!   existence, timestamp, heuristics, schema
//! - [`Repairer`] creates or updates items per file, isolating failures, and
//!   optionally records refreshed assets in the version ledger through a
//!   [`LedgerTracker`]
//!
//! # Example
//!
//! ```no_run
//! use catalog_metadata::{
//!     ChangeDetector, FixOptions, FreshnessClassifier, JsonItemStore, MetadataExtractor,
//!     MetadataSnapshot, Repairer, check_files,
//! };
//! use std::path::Path;
//!
//! struct MtimeOnly;
//!
//! impl MetadataExtractor for MtimeOnly {
//!     fn extract(&self, file: &Path) -> catalog_metadata::Result<MetadataSnapshot> {
//!         Ok(MetadataSnapshot::default().with_mtime(catalog_fs::mtime_secs(file)?))
//!     }
//! }
//!
//! # fn main() -> catalog_metadata::Result<()> {
//! let store = JsonItemStore::new();
//! let detector = ChangeDetector::new(&MtimeOnly, &store);
//! let report = check_files(&detector, &FreshnessClassifier::new(), ["data/roads.parquet"])?;
//!
//! if !report.passed() {
//!     let fixes = Repairer::new(&MtimeOnly, &store).fix(&report.results, FixOptions::default());
//!     println!("repaired {} of {}", fixes.success_count(), fixes.total_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod detector;
pub mod error;
pub mod item_store;
pub mod logging;
pub mod policy;
pub mod repair;
pub mod snapshot;
pub mod status;
pub mod tracking;

pub use classifier::{DEFAULT_BBOX_TOLERANCE, FreshnessClassifier};
pub use config::FreshnessConfig;
pub use detector::{ChangeDetector, ItemStore, MetadataExtractor, check_files};
pub use error::{Error, Result};
pub use item_store::{CatalogItem, ITEM_SUFFIX, JsonItemStore};
pub use policy::{
    LenientPolicy, POLICY_NAMES, SchemaChangePolicy, StrictPolicy, StructuralPolicy,
    policy_by_name,
};
pub use repair::{FixAction, FixOptions, FixReport, FixResult, Repairer};
pub use snapshot::{BoundingBox, FileMetadataState, MetadataSnapshot};
pub use status::{MetadataCheckResult, MetadataReport, MetadataStatus};
pub use tracking::{LedgerTracker, RefreshedFile};
