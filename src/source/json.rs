//! Conversion of JSON record payloads into raw rows.

use crate::error::SourceError;
use crate::models::RawRow;
use serde_json::Value;
use tracing::warn;

/// Keys under which APIs commonly wrap the record array.
const WRAPPER_KEYS: [&str; 4] = ["data", "documents", "results", "items"];

/// Convert a payload (bare array, or object wrapping an array) into rows.
pub fn rows_from_payload(payload: Value) -> Result<Vec<RawRow>, SourceError> {
    let records = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let key = WRAPPER_KEYS
                .iter()
                .find(|key| matches!(map.get(**key), Some(Value::Array(_))))
                .ok_or_else(|| {
                    SourceError::Shape(format!(
                        "object payload has no array under any of {:?}",
                        WRAPPER_KEYS
                    ))
                })?;
            match map.remove(*key) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        other => {
            return Err(SourceError::Shape(format!(
                "expected an array or object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match record {
            Value::Object(fields) => rows.push(
                fields
                    .into_iter()
                    .filter_map(|(key, value)| value_to_string(value).map(|v| (key, v)))
                    .collect(),
            ),
            other => warn!("Skipping record {}: not an object ({})", index, json_kind(&other)),
        }
    }

    Ok(rows)
}

/// Render a JSON value as a row cell. Nulls count as absent.
fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let rows = rows_from_payload(json!([
            {"fraud_risk_score": 0.82, "document_type": "check", "payer_name": null},
            {"fraud_risk_score": "0.1", "status": true}
        ]))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["fraud_risk_score"], "0.82");
        assert_eq!(rows[0]["document_type"], "check");
        assert!(!rows[0].contains_key("payer_name"));
        assert_eq!(rows[1]["status"], "true");
    }

    #[test]
    fn test_wrapped_array() {
        let rows = rows_from_payload(json!({
            "total": 1,
            "documents": [{"document_id": 7, "meta": {"pages": 2}}]
        }))
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["document_id"], "7");
        assert_eq!(rows[0]["meta"], "{\"pages\":2}");
    }

    #[test]
    fn test_non_object_records_are_skipped() {
        let rows = rows_from_payload(json!([1, {"a": "b"}, "x"])).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_bad_shapes() {
        assert!(matches!(
            rows_from_payload(json!({"count": 3})),
            Err(SourceError::Shape(_))
        ));
        assert!(matches!(
            rows_from_payload(json!("nope")),
            Err(SourceError::Shape(_))
        ));
    }
}
