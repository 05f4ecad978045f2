//! Error types for catalog-metadata

use std::path::PathBuf;

/// Result type for catalog-metadata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while detecting, classifying, or repairing metadata
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The extractor could not read metadata from a data file
    #[error("Failed to extract metadata from {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    /// The item store could not read or write a catalog item
    #[error("Catalog item error for {path}: {reason}")]
    Item { path: PathBuf, reason: String },

    /// Configuration value is invalid
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Filesystem error from catalog-fs
    #[error(transparent)]
    Fs(#[from] catalog_fs::Error),

    /// Ledger error from catalog-versions
    #[error(transparent)]
    Versions(#[from] catalog_versions::Error),

    /// Backend error from catalog-backend
    #[error(transparent)]
    Backend(#[from] catalog_backend::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn extraction(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn item(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Item {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
