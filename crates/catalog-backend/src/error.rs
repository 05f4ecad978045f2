//! Error types for catalog-backend

/// Result type for catalog-backend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by backend resolution and backend operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No backend is registered under the requested name
    #[error("Unknown backend '{name}' (available: {})", .available.join(", "))]
    UnknownBackend { name: String, available: Vec<String> },

    /// The backend's loader failed before a constructor was obtained
    #[error("Failed to load backend '{name}': {reason} (available: {})", .available.join(", "))]
    BackendLoad {
        name: String,
        reason: String,
        available: Vec<String>,
    },

    /// The backend's constructor failed
    #[error("Failed to instantiate backend '{name}': {reason} (available: {})", .available.join(", "))]
    BackendInstantiation {
        name: String,
        reason: String,
        available: Vec<String>,
    },

    /// The instance does not expose every operation of the backend protocol
    #[error("Backend '{name}' violates the backend protocol: {reason} (available: {})", .available.join(", "))]
    BackendProtocol {
        name: String,
        reason: String,
        available: Vec<String>,
    },

    /// The backend declined an operation it does not support
    #[error("Backend '{backend}' does not support {operation}")]
    Unsupported { backend: String, operation: String },

    /// Ledger error from catalog-versions
    #[error(transparent)]
    Versions(#[from] catalog_versions::Error),

    /// Filesystem error from catalog-fs
    #[error(transparent)]
    Fs(#[from] catalog_fs::Error),
}
