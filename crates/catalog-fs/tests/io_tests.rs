use catalog_fs::io;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("versions.json");

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("versions.json");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_creates_missing_parents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a").join("b").join("versions.json");

    io::write_text(&path, "deep content").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "deep content");
}

#[test]
fn test_temp_file_lives_in_destination_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("collection").join("versions.json");
    let mut seen_dir = None;

    io::write_atomic_with(&path, |_file| {
        // The temp file is open at this point; find it next to the destination.
        let entries: Vec<_> = fs::read_dir(temp.path().join("collection"))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        seen_dir = Some(entries);
        Ok(())
    })
    .unwrap();

    let entries = seen_dir.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with(".versions.json."));
    assert!(entries[0].ends_with(".tmp"));
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let result = io::read_text(&temp.path().join("missing.json"));
    assert!(result.unwrap_err().is_not_found());
}
