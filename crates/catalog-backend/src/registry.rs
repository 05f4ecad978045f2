//! Process-wide, name-keyed backend registry
//!
//! Resolution happens in three stages, each with its own error: the entry's
//! loader produces a constructor, the constructor produces an instance, and
//! the instance must declare every protocol operation. Nothing is cached, so
//! every [`resolve`] call returns a fresh instance.

use std::fmt;
use std::sync::{Arc, LazyLock, RwLock};

use crate::file::FileBackend;
use crate::protocol::{VersionBackend, missing_operations};
use crate::{Error, Result};

/// Zero-argument factory producing a backend instance.
pub type Constructor =
    Arc<dyn Fn() -> std::result::Result<Box<dyn VersionBackend>, String> + Send + Sync>;

type Loader = Arc<dyn Fn() -> std::result::Result<Constructor, String> + Send + Sync>;

static REGISTRY: LazyLock<RwLock<Vec<BackendEntry>>> = LazyLock::new(|| RwLock::new(Vec::new()));

/// A named backend registration.
#[derive(Clone)]
pub struct BackendEntry {
    name: String,
    description: String,
    loader: Loader,
}

impl BackendEntry {
    /// Register an infallible factory.
    pub fn new<F, B>(name: impl Into<String>, description: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> B + Send + Sync + 'static,
        B: VersionBackend + 'static,
    {
        let factory = Arc::new(factory);
        Self::lazy(name, description, move || {
            let factory = Arc::clone(&factory);
            let constructor: Constructor = Arc::new(
                move || -> std::result::Result<Box<dyn VersionBackend>, String> {
                    Ok(Box::new(factory()))
                },
            );
            Ok(constructor)
        })
    }

    /// Register a loader that produces the constructor on demand.
    ///
    /// Either stage may fail with a reason string; the registry reports the
    /// two failures as distinct errors.
    pub fn lazy<L>(name: impl Into<String>, description: impl Into<String>, loader: L) -> Self
    where
        L: Fn() -> std::result::Result<Constructor, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            loader: Arc::new(loader),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for BackendEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Add a backend to the process-wide registry.
///
/// Duplicate names are kept; resolution uses the first match.
pub fn register_backend(entry: BackendEntry) {
    tracing::debug!(backend = %entry.name, "registering version backend");
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    registry.push(entry);
}

/// Remove every registration under `name`. Returns whether any existed.
pub fn unregister_backend(name: &str) -> bool {
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    let before = registry.len();
    registry.retain(|entry| entry.name != name);
    before != registry.len()
}

/// Names that [`resolve`] accepts: `"file"` first, then registered names in
/// registration order without duplicates.
pub fn available_backends() -> Vec<String> {
    let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    let mut names = vec![FileBackend::NAME.to_string()];
    for entry in registry.iter() {
        if !names.contains(&entry.name) {
            names.push(entry.name.clone());
        }
    }
    names
}

/// Build a fresh backend instance by name.
///
/// `"file"` always yields the built-in [`FileBackend`].
///
/// # Errors
///
/// - [`Error::UnknownBackend`] if nothing is registered under `name`
/// - [`Error::BackendLoad`] if the entry's loader fails
/// - [`Error::BackendInstantiation`] if the constructor fails
/// - [`Error::BackendProtocol`] if the instance lacks protocol operations
///
/// Every error lists the available backend names.
pub fn resolve(name: &str) -> Result<Box<dyn VersionBackend>> {
    if name == FileBackend::NAME {
        return Ok(Box::new(FileBackend::new()));
    }

    let entry = {
        let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
        registry.iter().find(|entry| entry.name == name).cloned()
    };

    let Some(entry) = entry else {
        return Err(Error::UnknownBackend {
            name: name.to_string(),
            available: available_backends(),
        });
    };

    let constructor = (entry.loader)().map_err(|reason| Error::BackendLoad {
        name: name.to_string(),
        reason,
        available: available_backends(),
    })?;

    let backend = constructor().map_err(|reason| Error::BackendInstantiation {
        name: name.to_string(),
        reason,
        available: available_backends(),
    })?;

    let missing = missing_operations(backend.as_ref());
    if !missing.is_empty() {
        let missing: Vec<&str> = missing.iter().map(|op| op.as_str()).collect();
        return Err(Error::BackendProtocol {
            name: name.to_string(),
            reason: format!("missing operations: {}", missing.join(", ")),
            available: available_backends(),
        });
    }

    tracing::debug!(backend = name, "resolved version backend");
    Ok(backend)
}
