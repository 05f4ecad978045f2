//! Reading and writing the ledger file
//!
//! The on-disk form is pretty-printed JSON with a trailing newline. Field
//! order is fixed by the model structs and optional fields are omitted when
//! absent, so diffs between ledger revisions stay minimal.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::model::timestamp;
use crate::{Error, Result, VersionHistory};

const REQUIRED_TOP_LEVEL: [&str; 3] = ["spec_version", "current_version", "versions"];
const REQUIRED_VERSION: [&str; 5] = ["version", "created", "breaking", "assets", "changes"];
const REQUIRED_ASSET: [&str; 3] = ["sha256", "size_bytes", "href"];

/// Read a ledger from disk.
///
/// A corrupt ledger is never partially trusted: any structural problem fails
/// the whole read.
///
/// # Errors
///
/// - [`Error::MissingLedger`] if the file does not exist
/// - [`Error::MalformedLedger`] if the content is not valid JSON, a required
///   field is absent, or a field has the wrong shape; `field` is the JSON
///   path of the offending field, e.g. `versions[2].created`
pub fn read(path: &Path) -> Result<VersionHistory> {
    let content = catalog_fs::read_text(path).map_err(|e| {
        if e.is_not_found() {
            Error::MissingLedger {
                path: path.to_path_buf(),
            }
        } else {
            Error::Fs(e)
        }
    })?;

    let value: Value = serde_json::from_str(&content)
        .map_err(|e| Error::malformed(path, "<document>", e.to_string()))?;

    validate(&value).map_err(|(field, reason)| Error::malformed(path, field, reason))?;

    let history: VersionHistory = serde_json::from_value(value)
        .map_err(|e| Error::malformed(path, "<document>", e.to_string()))?;

    tracing::debug!(
        path = %path.display(),
        versions = history.len(),
        current = ?history.current_version(),
        "read version ledger"
    );

    Ok(history)
}

/// Write a ledger to disk atomically.
///
/// The JSON is streamed into a temporary file next to `path` and renamed over
/// it only after a successful flush, so a crash or serialization failure
/// leaves any previous ledger intact.
pub fn write(path: &Path, history: &VersionHistory) -> Result<()> {
    catalog_fs::write_atomic_with(path, |file| {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, history)?;
        writer.write_all(b"\n")?;
        writer.flush()
    })?;

    tracing::debug!(
        path = %path.display(),
        versions = history.len(),
        current = ?history.current_version(),
        "wrote version ledger"
    );

    Ok(())
}

/// Check the structure the model relies on before deserializing.
///
/// Returns the JSON path of the first offending field and a reason.
fn validate(value: &Value) -> std::result::Result<(), (String, String)> {
    let root = value
        .as_object()
        .ok_or_else(|| ("<document>".to_string(), "expected a JSON object".to_string()))?;
    require_fields(root, &REQUIRED_TOP_LEVEL, "")?;

    if !matches!(root["current_version"], Value::Null | Value::String(_)) {
        return Err(wrong_type("current_version", "a string or null"));
    }

    let versions = root["versions"]
        .as_array()
        .ok_or_else(|| wrong_type("versions", "an array"))?;

    for (i, entry) in versions.iter().enumerate() {
        let prefix = format!("versions[{}]", i);
        let version = entry
            .as_object()
            .ok_or_else(|| wrong_type(&prefix, "an object"))?;
        require_fields(version, &REQUIRED_VERSION, &prefix)?;

        let created_field = format!("{}.created", prefix);
        let created = version["created"]
            .as_str()
            .ok_or_else(|| wrong_type(&created_field, "an RFC3339 string"))?;
        timestamp::parse(created).map_err(|e| (created_field, e.to_string()))?;

        let assets_field = format!("{}.assets", prefix);
        let assets = version["assets"]
            .as_object()
            .ok_or_else(|| wrong_type(&assets_field, "an object"))?;
        for (name, asset) in assets {
            let asset_prefix = format!("{}.{}", assets_field, name);
            let asset = asset
                .as_object()
                .ok_or_else(|| wrong_type(&asset_prefix, "an object"))?;
            require_fields(asset, &REQUIRED_ASSET, &asset_prefix)?;
        }
    }

    Ok(())
}

fn require_fields(
    object: &Map<String, Value>,
    fields: &[&str],
    prefix: &str,
) -> std::result::Result<(), (String, String)> {
    match fields.iter().find(|f| !object.contains_key(**f)) {
        Some(missing) => {
            let field = if prefix.is_empty() {
                missing.to_string()
            } else {
                format!("{}.{}", prefix, missing)
            };
            Err((field, "missing required field".to_string()))
        }
        None => Ok(()),
    }
}

fn wrong_type(field: &str, expected: &str) -> (String, String) {
    (field.to_string(), format!("expected {}", expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validate_accepts_null_current_version() {
        let doc = json!({"spec_version": "1.0.0", "current_version": null, "versions": []});
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn validate_names_nested_asset_field() {
        let doc = json!({
            "spec_version": "1.0.0",
            "current_version": "1.0.0",
            "versions": [{
                "version": "1.0.0",
                "created": "2024-01-15T10:30:00Z",
                "breaking": false,
                "assets": {"a.parquet": {"sha256": "x", "href": "./a.parquet"}},
                "changes": ["a.parquet"]
            }]
        });

        let (field, reason) = validate(&doc).unwrap_err();
        assert_eq!(field, "versions[0].assets.a.parquet.size_bytes");
        assert_eq!(reason, "missing required field");
    }

    #[test]
    fn validate_rejects_bad_timestamp() {
        let doc = json!({
            "spec_version": "1.0.0",
            "current_version": "1.0.0",
            "versions": [{
                "version": "1.0.0",
                "created": "yesterday",
                "breaking": false,
                "assets": {},
                "changes": []
            }]
        });

        let (field, _) = validate(&doc).unwrap_err();
        assert_eq!(field, "versions[0].created");
    }

    #[test]
    fn validate_rejects_non_string_pointer() {
        let doc = json!({"spec_version": "1.0.0", "current_version": 3, "versions": []});
        let (field, _) = validate(&doc).unwrap_err();
        assert_eq!(field, "current_version");
    }
}
