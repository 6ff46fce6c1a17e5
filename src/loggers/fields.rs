//! Bound and call-site context fields.

use serde::Serialize;
use serde_json::Value;

use crate::core::error::LogError;

/// String-keyed JSON mapping used for bound fields, call-site fields and the
/// assembled record.
pub type Fields = serde_json::Map<String, Value>;

/// Union of both mappings; on a shared key the `primary` value wins.
/// Neither input is touched, absent inputs count as empty.
pub fn merge(primary: Option<&Fields>, secondary: Option<&Fields>) -> Fields {
    let mut out = secondary.cloned().unwrap_or_default();
    if let Some(primary) = primary {
        for (k, v) in primary {
            out.insert(k.clone(), v.clone());
        }
    }
    out
}

/// Converts any serializable map-like value into [`Fields`].
///
/// Fails with [`LogError::SerializationError`] when the value cannot be
/// represented as JSON or is not a JSON object.
pub fn to_fields<T: Serialize>(value: T) -> Result<Fields, LogError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Fields::new()),
        other => Err(LogError::SerializationError(format!(
            "fields must be a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
