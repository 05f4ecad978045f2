//! Error types for catalog-versions

use std::path::PathBuf;

/// Result type for catalog-versions operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, writing, or updating a ledger
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No ledger exists at the given location
    #[error("Ledger not found at {path}")]
    MissingLedger { path: PathBuf },

    /// Ledger content is unparseable or violates the ledger schema
    #[error("Malformed ledger at {path}: field `{field}`: {reason}")]
    MalformedLedger {
        path: PathBuf,
        field: String,
        reason: String,
    },

    /// A version string that is being introduced is not `major.minor.patch`
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// The requested version is not part of the history
    #[error("Version not found: {version}")]
    VersionNotFound { version: String },

    /// A new version does not sort after the newest existing version
    #[error("Version {version} must be greater than latest version {latest}")]
    VersionConflict { version: String, latest: String },

    /// Prune was asked to do something outside its bounds
    #[error("Invalid prune: {reason}")]
    InvalidPrune { reason: String },

    /// Filesystem error from catalog-fs
    #[error(transparent)]
    Fs(#[from] catalog_fs::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedLedger {
            path: path.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}
