//! Substitutable persistence for catalog version ledgers
//!
//! Callers that want to swap the ledger's storage go through the
//! [`VersionBackend`] trait and look implementations up by name:
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> catalog_backend::Result<()> {
//! let backend = catalog_backend::resolve("file")?;
//! let current = backend.get_current_version(Path::new("data/roads"))?;
//! println!("current: {:?}", current);
//! # Ok(())
//! # }
//! ```
//!
//! The built-in [`FileBackend`] is always available as `"file"`. Other
//! backends, such as a transactional multi-writer store, are added at runtime
//! with [`register_backend`].

pub mod error;
pub mod file;
pub mod protocol;
pub mod registry;

pub use error::{Error, Result};
pub use file::FileBackend;
pub use protocol::{
    BackendOperation, DriftReport, LedgerPointer, PublishRequest, VersionBackend,
    missing_operations,
};
pub use registry::{
    BackendEntry, Constructor, available_backends, register_backend, resolve, unregister_backend,
};
