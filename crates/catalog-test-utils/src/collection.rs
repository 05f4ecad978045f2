//! [`TestCollection`] builder for ledger and metadata test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use catalog_versions::{Asset, LEDGER_FILENAME, VersionHistory};
use tempfile::TempDir;

/// A temporary collection directory with helpers for writing data files and
/// ledgers.
///
/// # Example
///
/// ```rust,no_run
/// use catalog_test_utils::TestCollection;
///
/// let collection = TestCollection::new();
/// collection.write_file("roads.parquet", b"roads v1");
/// collection.assert_file_exists("roads.parquet");
/// ```
pub struct TestCollection {
    temp_dir: TempDir,
}

impl Default for TestCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCollection {
    /// Create an empty temporary collection directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestCollection::new: failed to create temp dir"),
        }
    }

    /// Root of the collection.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a file inside the collection.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Location of the collection's ledger.
    pub fn ledger_path(&self) -> PathBuf {
        self.path(LEDGER_FILENAME)
    }

    /// Write a data file, creating parent directories as needed.
    pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("TestCollection::write_file: create_dir_all");
        }
        fs::write(&path, content).expect("TestCollection::write_file: write");
        path
    }

    /// Read a file's bytes.
    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        fs::read(self.path(name)).expect("TestCollection::read_bytes: read")
    }

    /// Build an [`Asset`] for a file already written to the collection.
    pub fn asset(&self, name: &str) -> Asset {
        Asset::from_file(&self.path(name), format!("./{}", name))
            .expect("TestCollection::asset: hash file")
    }

    /// Persist a history as the collection's ledger.
    pub fn write_ledger(&self, history: &VersionHistory) {
        catalog_versions::write(&self.ledger_path(), history)
            .expect("TestCollection::write_ledger: write");
    }

    /// Read the collection's ledger.
    pub fn read_ledger(&self) -> VersionHistory {
        catalog_versions::read(&self.ledger_path()).expect("TestCollection::read_ledger: read")
    }

    /// Names of all entries directly inside the collection, sorted.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root())
            .expect("TestCollection::file_names: read_dir")
            .map(|entry| {
                entry
                    .expect("TestCollection::file_names: entry")
                    .file_name()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        names.sort();
        names
    }

    /// Assert that a file exists in the collection.
    pub fn assert_file_exists(&self, name: &str) {
        assert!(
            self.path(name).exists(),
            "Expected file to exist: {}",
            self.path(name).display()
        );
    }

    /// Assert that a file does not exist in the collection.
    pub fn assert_file_not_exists(&self, name: &str) {
        assert!(
            !self.path(name).exists(),
            "Expected file to not exist: {}",
            self.path(name).display()
        );
    }
}
