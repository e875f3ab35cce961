//! Closed-schema checks for JSON definition records.
//!
//! Definition files are parsed into a [`serde_json::Value`] first and checked
//! against a [`RecordSchema`] before being deserialized, so that an unknown or
//! missing field is reported with its exact location rather than as a generic
//! deserialization failure.

use serde_json::{Map, Value};

use crate::error::{LoadError, Result};

/// The fields a JSON object may carry.
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl RecordSchema {
    pub const fn new(required: &'static [&'static str], optional: &'static [&'static str]) -> Self {
        Self { required, optional }
    }

    fn allows(&self, field: &str) -> bool {
        self.required.contains(&field) || self.optional.contains(&field)
    }
}

/// Check that `value` is an object whose keys match `schema`.
///
/// Unknown fields are reported before missing ones, in key order.
pub fn check_object<'a>(
    value: &'a Value,
    schema: &RecordSchema,
    source_name: &str,
    path: &str,
) -> Result<&'a Map<String, Value>> {
    let Some(object) = value.as_object() else {
        return Err(invalid(source_name, path, "expected an object"));
    };

    if let Some(field) = object.keys().find(|key| !schema.allows(key)) {
        return Err(LoadError::UnknownField {
            source_name: source_name.to_string(),
            path: path.to_string(),
            field: field.clone(),
        });
    }

    if let Some(field) = schema.required.iter().find(|f| !object.contains_key(**f)) {
        return Err(LoadError::MissingField {
            source_name: source_name.to_string(),
            path: path.to_string(),
            field: (*field).to_string(),
        });
    }

    Ok(object)
}

/// Check that an optional field, when present, is an array and return its items.
pub fn array_field<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    source_name: &str,
    path: &str,
) -> Result<&'a [Value]> {
    match object.get(field) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(invalid(
            source_name,
            &format!("{path}.{field}"),
            "expected an array",
        )),
    }
}

/// Build an [`LoadError::InvalidValue`].
pub fn invalid(source_name: &str, path: &str, message: impl Into<String>) -> LoadError {
    LoadError::InvalidValue {
        source_name: source_name.to_string(),
        path: path.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: RecordSchema = RecordSchema::new(&["code", "labels"], &["metadata"]);

    #[test]
    fn accepts_known_fields() {
        let value = serde_json::json!({"code": "a", "labels": {"en": "A"}});
        let object = check_object(&value, &SCHEMA, "test.json", "$").expect("valid");
        assert_eq!(object.len(), 2);
    }

    #[test]
    fn rejects_unknown_field() {
        let value = serde_json::json!({"code": "a", "labels": {}, "colour": "red"});
        let err = check_object(&value, &SCHEMA, "test.json", "$.entries[0]").unwrap_err();
        match err {
            LoadError::UnknownField { field, path, .. } => {
                assert_eq!(field, "colour");
                assert_eq!(path, "$.entries[0]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_missing_field() {
        let value = serde_json::json!({"code": "a"});
        let err = check_object(&value, &SCHEMA, "test.json", "$").unwrap_err();
        assert!(matches!(err, LoadError::MissingField { ref field, .. } if field == "labels"));
    }

    #[test]
    fn rejects_non_object() {
        let value = serde_json::json!(["a"]);
        assert!(matches!(
            check_object(&value, &SCHEMA, "test.json", "$"),
            Err(LoadError::InvalidValue { .. })
        ));
    }
}
