//! Typed extraction helpers over raw JSON values
//!
//! The document model is built by hand from `serde_json::Value` rather than
//! derived deserialization, because every structural error must name the
//! path it occurred at and must tell an absent field apart from an explicit
//! `null`. These helpers centralize that bookkeeping.

use crate::document::path::NodePath;
use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Require `value` to be a JSON object
pub(crate) fn require_object<'a>(
    value: &'a Value,
    path: &NodePath,
) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::structural(path.to_string(), type_mismatch("object", value)))
}

/// Require a field to be present, non-null, and an object
pub(crate) fn require_object_field<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<&'a Map<String, Value>> {
    require_object(require_field(map, field, path)?, &path.key(field))
}

/// Require a field to be present, non-null, and an array
pub(crate) fn require_array_field<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<&'a Vec<Value>> {
    let value = require_field(map, field, path)?;
    value.as_array().ok_or_else(|| {
        Error::structural(path.key(field).to_string(), type_mismatch("array", value))
    })
}

/// Require a field to be present, non-null, and a string
pub(crate) fn require_str(
    map: &Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<String> {
    let value = require_field(map, field, path)?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::structural(path.key(field).to_string(), type_mismatch("string", value)))
}

/// Read an optional string field, treating explicit `null` as absent
pub(crate) fn optional_str(
    map: &Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<Option<String>> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_str().map(str::to_owned).map(Some).ok_or_else(|| {
            Error::structural(path.key(field).to_string(), type_mismatch("string", value))
        }),
    }
}

/// Read an optional number field as f64, treating explicit `null` as absent
pub(crate) fn optional_f64(
    map: &Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<Option<f64>> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            Error::structural(path.key(field).to_string(), type_mismatch("number", value))
        }),
    }
}

/// Read an optional bool field, treating explicit `null` as absent
pub(crate) fn optional_bool(
    map: &Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<Option<bool>> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_bool().map(Some).ok_or_else(|| {
            Error::structural(path.key(field).to_string(), type_mismatch("boolean", value))
        }),
    }
}

/// Read an optional array field, treating absence and `null` as empty
pub(crate) fn optional_array<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<&'a [Value]> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(value) => value.as_array().map(Vec::as_slice).ok_or_else(|| {
            Error::structural(path.key(field).to_string(), type_mismatch("array", value))
        }),
    }
}

/// Read a field that may be a single string or a list of strings
///
/// OPDS and RWPM both allow `rel` to take either shape.
pub(crate) fn str_or_str_list(
    map: &Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<Vec<String>> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => {
            let field_path = path.key(field);
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        Error::structural(
                            field_path.index(i).to_string(),
                            type_mismatch("string", item),
                        )
                    })
                })
                .collect()
        }
        Some(other) => Err(Error::structural(
            path.key(field).to_string(),
            type_mismatch("string or array of strings", other),
        )),
    }
}

/// Collect the fields of `map` not named in `known` for forward-compatible
/// preservation
pub(crate) fn extra_fields(map: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Fetch a required field, distinguishing a missing field from an explicit
/// null
fn require_field<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    path: &NodePath,
) -> Result<&'a Value> {
    match map.get(field) {
        None => Err(Error::structural(
            path.to_string(),
            format!("missing required field `{}`", field),
        )),
        Some(Value::Null) => Err(Error::structural(
            path.key(field).to_string(),
            format!("field `{}` must not be null", field),
        )),
        Some(value) => Ok(value),
    }
}

fn type_mismatch(expected: &str, found: &Value) -> String {
    format!("expected {}, found {}", expected, json_type_name(found))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
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

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_and_null_are_distinct_errors() {
        let map = obj(json!({"title": null}));
        let path = NodePath::root().key("metadata");

        let missing = require_str(&map, "identifier", &path).unwrap_err();
        assert!(missing.to_string().contains("missing required field `identifier`"));
        assert!(missing.to_string().contains("$.metadata"));

        let null = require_str(&map, "title", &path).unwrap_err();
        assert!(null.to_string().contains("must not be null"));
        assert!(null.to_string().contains("$.metadata.title"));
    }

    #[test]
    fn wrong_type_names_path_and_types() {
        let map = obj(json!({"duration": "100"}));
        let err = optional_f64(&map, "duration", &NodePath::root().key("metadata")).unwrap_err();
        assert!(err.to_string().contains("expected number, found string"));
    }

    #[test]
    fn optional_fields_treat_null_as_absent() {
        let map = obj(json!({"duration": null, "title": null}));
        let path = NodePath::root();
        assert_eq!(optional_f64(&map, "duration", &path).unwrap(), None);
        assert_eq!(optional_str(&map, "title", &path).unwrap(), None);
        assert!(optional_array(&map, "links", &path).unwrap().is_empty());
    }

    #[test]
    fn rel_accepts_string_or_list() {
        let path = NodePath::root().key("links").index(0);
        let single = obj(json!({"rel": "self"}));
        assert_eq!(str_or_str_list(&single, "rel", &path).unwrap(), vec!["self"]);

        let multi = obj(json!({"rel": ["self", "alternate"]}));
        assert_eq!(
            str_or_str_list(&multi, "rel", &path).unwrap(),
            vec!["self", "alternate"]
        );

        let bad = obj(json!({"rel": 42}));
        assert!(str_or_str_list(&bad, "rel", &path).is_err());
    }

    #[test]
    fn extra_fields_preserves_unknown_keys() {
        let map = obj(json!({"href": "a.mp3", "x-vendor": true}));
        let extra = extra_fields(&map, &["href"]);
        assert_eq!(extra.len(), 1);
        assert!(extra.contains_key("x-vendor"));
    }
}
