use catalog_versions::{
    Asset, SchemaFingerprint, SchemaInfo, VersionHistory, append, parse_semantic_version, read,
    write,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn asset_strategy() -> impl Strategy<Value = Asset> {
    (
        "[0-9a-f]{64}",
        any::<u64>(),
        proptest::option::of(("[a-z/]{1,12}", 0.0f64..2.0e9)),
    )
        .prop_map(|(sha, size, source)| {
            let asset = Asset::new(sha, size, "./data.parquet");
            match source {
                Some((path, mtime)) => asset.with_source(path, mtime),
                None => asset,
            }
        })
}

fn assets_strategy() -> impl Strategy<Value = BTreeMap<String, Asset>> {
    proptest::collection::btree_map("[a-z]{1,8}\\.parquet", asset_strategy(), 0..5)
}

fn schema_strategy() -> impl Strategy<Value = SchemaInfo> {
    (
        prop_oneof![Just("geoparquet"), Just("cog")],
        proptest::collection::btree_map(
            "[a-z_]{1,10}",
            prop_oneof![Just("int64"), Just("string"), Just("geometry"), Just("float64")],
            0..6,
        ),
    )
        .prop_map(|(kind, columns)| SchemaInfo::new(kind, SchemaFingerprint::new(columns)))
}

fn history_strategy() -> impl Strategy<Value = VersionHistory> {
    proptest::collection::vec(
        (
            assets_strategy(),
            any::<bool>(),
            proptest::option::of(schema_strategy()),
            proptest::option::of("[ -~]{0,20}"),
        ),
        0..5,
    )
    .prop_map(|steps| {
        steps.into_iter().enumerate().fold(
            VersionHistory::new(),
            |history, (i, (assets, breaking, schema, message))| {
                append(&history, &format!("1.{}.0", i), assets, breaking, schema, message)
            },
        )
    })
}

proptest! {
    #[test]
    fn round_trip_reproduces_history(history in history_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versions.json");

        write(&path, &history).unwrap();

        prop_assert_eq!(read(&path).unwrap(), history);
    }

    #[test]
    fn append_grows_by_exactly_one(history in history_strategy(), assets in assets_strategy()) {
        let before = history.clone();

        let next = append(&history, "9.0.0", assets.clone(), false, None, None);

        prop_assert_eq!(next.len(), history.len() + 1);
        prop_assert_eq!(&history, &before);
        prop_assert_eq!(&next.versions()[..history.len()], history.versions());
        prop_assert_eq!(next.current_version(), Some("9.0.0"));

        let changes = &next.latest().unwrap().changes;
        for name in changes {
            prop_assert!(assets.contains_key(name));
        }
        if history.is_empty() {
            prop_assert_eq!(changes.len(), assets.len());
        }
    }

    #[test]
    fn semver_parse_never_panics(text in "\\PC*") {
        let _ = parse_semantic_version(&text);
    }

    #[test]
    fn semver_parse_reads_plain_triples(major in 0u64..10_000, minor in 0u64..10_000, patch in 0u64..10_000) {
        let text = format!("{}.{}.{}", major, minor, patch);
        prop_assert_eq!(parse_semantic_version(&text), (major, minor, patch));
    }
}
