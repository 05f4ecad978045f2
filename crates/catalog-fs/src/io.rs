//! Atomic I/O operations
//!
//! Every write goes to a temporary file created in the destination's own
//! directory and is then renamed over the destination. The rename is atomic
//! only within one filesystem, so the temporary file must never live in the
//! system temp directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::{Error, Result};

/// Write content atomically to a file.
///
/// Readers observe either the previous content or the new content, never a
/// partial write. Parent directories are created when missing.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    write_atomic_with(path, |file| file.write_all(content))
}

/// Write to a file atomically using a caller-supplied writer.
///
/// `write` receives the temporary file. If it returns an error, or any later
/// step (fsync, rename) fails, the temporary file is removed and the
/// destination is left byte-identical to its previous state.
pub fn write_atomic_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    );

    // Dropping the NamedTempFile on any early return deletes it.
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;

    write(temp.as_file_mut()).map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::io(temp.path(), e))?;

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;
    tracing::debug!(path = %path.display(), "atomic write committed");

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Modification time of a file as fractional seconds since the Unix epoch.
pub fn mtime_secs(path: &Path) -> Result<f64> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::io(path, e))?;
    let since_epoch = modified
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::io(path, std::io::Error::other(e)))?;
    Ok(since_epoch.as_secs_f64())
}
