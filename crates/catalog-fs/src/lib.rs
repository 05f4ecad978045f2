//! Filesystem primitives for catalog version ledgers
//!
//! Provides crash-safe writes (same-directory temp file, then atomic rename),
//! content checksums, and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;

pub use checksum::{compute_bytes_checksum, compute_file_checksum};
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::{mtime_secs, read_text, write_atomic, write_atomic_with, write_text};
