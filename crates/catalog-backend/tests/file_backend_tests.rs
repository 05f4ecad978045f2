//! Tests for the built-in file backend

use catalog_backend::{Error, FileBackend, PublishRequest, VersionBackend};
use catalog_test_utils::{TestCollection, fixtures};
use catalog_versions::{SchemaFingerprint, SchemaInfo};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn publish(backend: &FileBackend, collection: &TestCollection, version: &str, sha: &str) {
    backend
        .publish(
            collection.root(),
            PublishRequest::new(version, fixtures::assets(&[("roads.parquet", sha)])),
        )
        .unwrap();
}

fn version_names(backend: &FileBackend, collection: &TestCollection) -> Vec<String> {
    backend
        .list_versions(collection.root())
        .unwrap()
        .into_iter()
        .map(|v| v.version)
        .collect()
}

#[test]
fn test_publish_and_list() {
    let collection = TestCollection::new();
    let backend = FileBackend::new();

    publish(&backend, &collection, "1.0.0", "a");
    publish(&backend, &collection, "1.1.0", "b");

    assert_eq!(version_names(&backend, &collection), vec!["1.0.0", "1.1.0"]);
    assert_eq!(
        backend.get_current_version(collection.root()).unwrap().as_deref(),
        Some("1.1.0")
    );
    assert_eq!(collection.read_ledger().len(), 2);
}

#[test]
fn test_publish_carries_schema_and_message() {
    let collection = TestCollection::new();
    let backend = FileBackend::new();
    let schema = SchemaInfo::new("geoparquet", SchemaFingerprint::new([("id", "int64")]));

    let published = backend
        .publish(
            collection.root(),
            PublishRequest::new("2.0.0", fixtures::assets(&[("roads.parquet", "a")]))
                .breaking(true)
                .with_schema(schema.clone())
                .with_message("new layout"),
        )
        .unwrap();

    assert!(published.breaking);
    assert_eq!(published.schema, Some(schema));
    assert_eq!(published.message.as_deref(), Some("new layout"));
    assert_eq!(published.changes, vec!["roads.parquet"]);
}

#[rstest]
#[case("1.0.0")]
#[case("0.9.9")]
#[case("1.0.0-rc.1")]
fn test_publish_must_exceed_latest(#[case] version: &str) {
    let collection = TestCollection::new();
    let backend = FileBackend::new();
    publish(&backend, &collection, "1.0.0", "a");
    let before = collection.read_bytes("versions.json");

    let err = backend
        .publish(
            collection.root(),
            PublishRequest::new(version, fixtures::assets(&[])),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Versions(catalog_versions::Error::VersionConflict { .. })
    ));
    assert_eq!(collection.read_bytes("versions.json"), before);
}

#[test]
fn test_publish_rejects_invalid_version() {
    let collection = TestCollection::new();
    let backend = FileBackend::new();

    let err = backend
        .publish(
            collection.root(),
            PublishRequest::new("latest", fixtures::assets(&[])),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Versions(catalog_versions::Error::InvalidVersion { .. })
    ));
    collection.assert_file_not_exists("versions.json");
}

#[test]
fn test_rollback_appends_restored_copy() {
    let collection = TestCollection::new();
    let backend = FileBackend::new();
    publish(&backend, &collection, "1.0.0", "a");
    publish(&backend, &collection, "1.1.0", "b");

    let restored = backend.rollback(collection.root(), "1.0.0").unwrap();

    assert_eq!(restored.version, "1.1.1");
    assert_eq!(restored.assets["roads.parquet"].sha256, "a");
    assert_eq!(
        version_names(&backend, &collection),
        vec!["1.0.0", "1.1.0", "1.1.1"]
    );
    assert_eq!(
        backend.get_current_version(collection.root()).unwrap().as_deref(),
        Some("1.1.1")
    );
}

#[test]
fn test_rollback_without_ledger_fails() {
    let collection = TestCollection::new();
    let backend = FileBackend::new();

    let err = backend.rollback(collection.root(), "1.0.0").unwrap_err();

    assert!(matches!(
        err,
        Error::Versions(catalog_versions::Error::MissingLedger { .. })
    ));
}

#[test]
fn test_prune_dry_run_leaves_ledger_untouched() {
    let collection = TestCollection::new();
    collection.write_ledger(&fixtures::history(&["1.0.0", "1.1.0", "1.2.0"]));
    let before = collection.read_bytes("versions.json");
    let backend = FileBackend::new();

    let would_remove = backend.prune(collection.root(), 1, true).unwrap();

    assert_eq!(would_remove.len(), 2);
    assert_eq!(collection.read_bytes("versions.json"), before);
}

#[test]
fn test_prune_removes_oldest() {
    let collection = TestCollection::new();
    collection.write_ledger(&fixtures::history(&["1.0.0", "1.1.0", "1.2.0"]));
    let backend = FileBackend::new();

    let removed = backend.prune(collection.root(), 2, false).unwrap();

    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].version, "1.0.0");
    assert_eq!(version_names(&backend, &collection), vec!["1.1.0", "1.2.0"]);
}

#[test]
fn test_prune_zero_is_rejected() {
    let collection = TestCollection::new();
    collection.write_ledger(&fixtures::history(&["1.0.0"]));
    let backend = FileBackend::new();

    let err = backend.prune(collection.root(), 0, false).unwrap_err();

    assert!(matches!(
        err,
        Error::Versions(catalog_versions::Error::InvalidPrune { .. })
    ));
}

#[test]
fn test_drift_detects_out_of_band_write() {
    let collection = TestCollection::new();
    let ours = FileBackend::new();
    let theirs = FileBackend::new();
    publish(&ours, &collection, "1.0.0", "a");

    publish(&theirs, &collection, "1.1.0", "b");

    let report = ours.check_drift(collection.root()).unwrap();
    assert!(report.has_drift);
    assert_eq!(
        report.expected.unwrap().current_version.as_deref(),
        Some("1.0.0")
    );
    assert_eq!(
        report.actual.unwrap().current_version.as_deref(),
        Some("1.1.0")
    );
    assert!(!theirs.check_drift(collection.root()).unwrap().has_drift);
}

#[test]
fn test_drift_check_does_not_reset_baseline() {
    let collection = TestCollection::new();
    let ours = FileBackend::new();
    publish(&ours, &collection, "1.0.0", "a");
    publish(&FileBackend::new(), &collection, "1.1.0", "b");

    assert!(ours.check_drift(collection.root()).unwrap().has_drift);
    assert!(ours.check_drift(collection.root()).unwrap().has_drift);
}

#[test]
fn test_no_baseline_reports_no_drift() {
    let collection = TestCollection::new();
    collection.write_ledger(&fixtures::history(&["1.0.0"]));

    let report = FileBackend::new().check_drift(collection.root()).unwrap();

    assert!(!report.has_drift);
    assert!(report.expected.is_none());
    assert_eq!(report.actual.unwrap().version_count, 1);
}

#[test]
fn test_deleted_ledger_is_drift() {
    let collection = TestCollection::new();
    let backend = FileBackend::new();
    publish(&backend, &collection, "1.0.0", "a");
    std::fs::remove_file(collection.ledger_path()).unwrap();

    let report = backend.check_drift(collection.root()).unwrap();

    assert!(report.has_drift);
    assert!(report.actual.is_none());
}
