//! Append-only version ledger for catalog collections
//!
//! A collection's ledger (`versions.json`) records every published version of
//! its data files as content-addressed assets. This crate provides:
//!
//! - **Data model**: [`Asset`], [`SchemaFingerprint`], [`Version`], [`VersionHistory`]
//! - **Persistence**: [`read`] and [`write`], the latter crash-safe via an
//!   atomic same-directory rename
//! - **Pure history updates**: [`append`], [`prune`], [`rollback`] each return
//!   a new history and never modify their input
//! - **Precedence**: [`parse_semantic_version`] and [`SemanticVersion`]
//!
//! # Example
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use std::path::Path;
//! use catalog_versions::{Asset, VersionHistory, append, read, write};
//!
//! # fn main() -> catalog_versions::Result<()> {
//! let path = Path::new("collection/versions.json");
//! let history = read(path).unwrap_or_else(|_| VersionHistory::new());
//!
//! let mut assets = BTreeMap::new();
//! assets.insert(
//!     "roads.parquet".to_string(),
//!     Asset::new("9f86d081884c7d65", 1024, "./roads.parquet"),
//! );
//!
//! let next = append(&history, "1.0.0", assets, false, None, Some("initial load".into()));
//! write(path, &next)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod history;
pub mod model;
pub mod precedence;
pub mod store;

/// File name of the version ledger inside a collection directory.
pub const LEDGER_FILENAME: &str = "versions.json";

/// Format tag written to the `spec_version` field of new ledgers.
pub const SPEC_VERSION: &str = "1.0.0";

pub use error::{Error, Result};
pub use history::{append, compute_changes, prune, rollback};
pub use model::{Asset, SchemaDiff, SchemaFingerprint, SchemaInfo, Version, VersionHistory};
pub use precedence::{SemanticVersion, parse_semantic_version};
pub use store::{read, write};
