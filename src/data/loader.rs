use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use super::error::{LoadError, LoadWarning};
use super::model::RawRecord;
use crate::config::{LimitsConfig, RowLimitPolicy};

/// Field holding the measured state labels.
pub const STATEVECTOR_FIELD: &str = "statevector";

/// Records parsed from one upload, plus any non-fatal conditions.
#[derive(Debug, Clone, Default)]
pub struct LoadedStates {
    pub records: Vec<RawRecord>,
    pub warnings: Vec<LoadWarning>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read an upload from disk, rejecting it on its reported size before the
/// contents are read.
pub fn read_upload(path: &Path, limits: &LimitsConfig) -> Result<Vec<u8>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let meta = std::fs::metadata(path).map_err(io_err)?;
    check_size(meta.len(), limits)?;
    std::fs::read(path).map_err(io_err)
}

/// Reject payloads larger than `limits.max_upload_bytes`.
pub fn check_size(len: u64, limits: &LimitsConfig) -> Result<(), LoadError> {
    if len > limits.max_upload_bytes {
        return Err(LoadError::TooLarge {
            size: len,
            limit: limits.max_upload_bytes,
        });
    }
    Ok(())
}

/// Parse an uploaded payload into state records.
///
/// Accepted layouts:
///
/// ```json
/// { "statevector": ["00", "01", "00"] }
/// ```
///
/// ```json
/// [ { "statevector": "00" }, { "statevector": "01" } ]
/// ```
///
/// The size check runs before the bytes are parsed.
pub fn load_bytes(bytes: &[u8], limits: &LimitsConfig) -> Result<LoadedStates, LoadError> {
    check_size(bytes.len() as u64, limits)?;

    let root: JsonValue = serde_json::from_slice(bytes).map_err(LoadError::Malformed)?;

    let records = match &root {
        JsonValue::Object(obj) => records_from_columns(obj)?,
        JsonValue::Array(rows) => records_from_rows(rows)?,
        _ => return Err(LoadError::MissingField),
    };

    let mut warnings = Vec::new();
    if records.len() > limits.max_rows {
        match limits.row_limit_policy {
            RowLimitPolicy::Reject => {
                return Err(LoadError::TooManyRows {
                    rows: records.len(),
                    limit: limits.max_rows,
                });
            }
            RowLimitPolicy::Warn => {
                log::warn!(
                    "{} records exceed the soft limit of {}",
                    records.len(),
                    limits.max_rows
                );
                warnings.push(LoadWarning::TooManyRows {
                    rows: records.len(),
                    limit: limits.max_rows,
                });
            }
        }
    }

    Ok(LoadedStates { records, warnings })
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

/// `{ "statevector": [...] }`
fn records_from_columns(obj: &Map<String, JsonValue>) -> Result<Vec<RawRecord>, LoadError> {
    let column = obj.get(STATEVECTOR_FIELD).ok_or(LoadError::MissingField)?;
    let values = column.as_array().ok_or_else(|| {
        LoadError::Schema(format!("`{STATEVECTOR_FIELD}` is not an array"))
    })?;

    values
        .iter()
        .enumerate()
        .map(|(i, v)| label_from_json(v, i).map(RawRecord::new))
        .collect()
}

/// `[ { "statevector": ... }, ... ]`
fn records_from_rows(rows: &[JsonValue]) -> Result<Vec<RawRecord>, LoadError> {
    let has_field = rows
        .iter()
        .any(|r| r.as_object().is_some_and(|o| o.contains_key(STATEVECTOR_FIELD)));
    if !has_field {
        return Err(LoadError::MissingField);
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let obj = row
                .as_object()
                .ok_or_else(|| LoadError::Schema(format!("record {i} is not an object")))?;
            let value = obj.get(STATEVECTOR_FIELD).ok_or_else(|| {
                LoadError::Schema(format!("record {i} has no `{STATEVECTOR_FIELD}`"))
            })?;
            label_from_json(value, i).map(RawRecord::new)
        })
        .collect()
}

/// Strings are taken verbatim; integers and booleans are stringified so a
/// cell holding `101` becomes the label `"101"`.
fn label_from_json(val: &JsonValue, index: usize) -> Result<String, LoadError> {
    match val {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Null => Err(LoadError::Schema(format!("record {index} is null"))),
        other => Err(LoadError::Schema(format!(
            "record {index} is not a state label: {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn labels(loaded: &LoadedStates) -> Vec<&str> {
        loaded
            .records
            .iter()
            .map(|r| r.state_label.as_str())
            .collect()
    }

    #[test]
    fn loads_column_layout() {
        let loaded = load_bytes(
            br#"{"statevector": ["00","01","00","10","00","01"]}"#,
            &LimitsConfig::default(),
        )
        .unwrap();
        assert_eq!(labels(&loaded), ["00", "01", "00", "10", "00", "01"]);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn loads_record_layout() {
        let loaded = load_bytes(
            br#"[{"statevector": "0"}, {"statevector": "1", "shot": 2}]"#,
            &LimitsConfig::default(),
        )
        .unwrap();
        assert_eq!(labels(&loaded), ["0", "1"]);
    }

    #[test]
    fn stringifies_integer_and_bool_labels() {
        let loaded = load_bytes(
            br#"{"statevector": [101, true, "11"]}"#,
            &LimitsConfig::default(),
        )
        .unwrap();
        assert_eq!(labels(&loaded), ["101", "true", "11"]);
    }

    #[test]
    fn empty_statevector_is_not_an_error() {
        let loaded = load_bytes(br#"{"statevector": []}"#, &LimitsConfig::default()).unwrap();
        assert!(loaded.records.is_empty());
    }

    #[test]
    fn rejects_invalid_json() {
        let err = load_bytes(b"{not json", &LimitsConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn rejects_missing_field() {
        let limits = LimitsConfig::default();
        for payload in [
            &br#"{"states": ["0"]}"#[..],
            br#"{"StateVector": ["0"]}"#,
            br#"[{"states": "0"}]"#,
            br#"[]"#,
            br#""statevector""#,
        ] {
            let err = load_bytes(payload, &limits).unwrap_err();
            assert!(matches!(err, LoadError::MissingField), "{err}");
        }
    }

    #[test]
    fn rejects_non_label_values() {
        let limits = LimitsConfig::default();
        for payload in [
            &br#"{"statevector": "0101"}"#[..],
            br#"{"statevector": ["0", null]}"#,
            br#"{"statevector": [1.5]}"#,
            br#"{"statevector": [["0"]]}"#,
            br#"[{"statevector": "0"}, {"other": "1"}]"#,
        ] {
            let err = load_bytes(payload, &limits).unwrap_err();
            assert!(matches!(err, LoadError::Schema(_)), "{err}");
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        let limits = LimitsConfig::default();
        assert!(check_size(5 * 1024 * 1024, &limits).is_ok());
        let err = check_size(6 * 1024 * 1024, &limits).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { .. }));
    }

    #[test]
    fn oversized_payload_rejected_before_parsing() {
        let limits = LimitsConfig {
            max_upload_bytes: 8,
            ..LimitsConfig::default()
        };
        // Not JSON, so a parse attempt would report Malformed instead.
        let err = load_bytes(b"0123456789", &limits).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { size: 10, limit: 8 }));
    }

    #[test]
    fn payload_of_exactly_the_limit_is_parsed() {
        let body = br#"{"statevector": ["0"]}"#;
        let limits = LimitsConfig {
            max_upload_bytes: body.len() as u64,
            ..LimitsConfig::default()
        };
        assert_eq!(labels(&load_bytes(body, &limits).unwrap()), ["0"]);
    }

    #[test]
    fn row_limit_warns_by_default() {
        let limits = LimitsConfig {
            max_rows: 2,
            ..LimitsConfig::default()
        };
        let loaded = load_bytes(br#"{"statevector": ["0","1","0"]}"#, &limits).unwrap();
        assert_eq!(loaded.records.len(), 3);
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::TooManyRows { rows: 3, limit: 2 }]
        );
    }

    #[test]
    fn row_limit_rejects_when_configured() {
        let limits = LimitsConfig {
            max_rows: 2,
            row_limit_policy: RowLimitPolicy::Reject,
            ..LimitsConfig::default()
        };
        let err = load_bytes(br#"{"statevector": ["0","1","0"]}"#, &limits).unwrap_err();
        assert!(matches!(err, LoadError::TooManyRows { rows: 3, limit: 2 }));
    }

    #[test]
    fn read_upload_then_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"statevector": ["1","1"]}"#).unwrap();
        let limits = LimitsConfig::default();
        let bytes = read_upload(file.path(), &limits).unwrap();
        assert_eq!(labels(&load_bytes(&bytes, &limits).unwrap()), ["1", "1"]);
    }

    #[test]
    fn read_upload_checks_reported_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b' '; 64]).unwrap();
        let limits = LimitsConfig {
            max_upload_bytes: 63,
            ..LimitsConfig::default()
        };
        let err = read_upload(file.path(), &limits).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { size: 64, limit: 63 }));
    }

    #[test]
    fn read_upload_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_upload(&dir.path().join("nope.json"), &LimitsConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
