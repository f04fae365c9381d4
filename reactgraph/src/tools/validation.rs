//! Validate tool call arguments against the tool's JSON Schema before execution.
//!
//! Covers the subset tools declare in practice: top-level `type: object`, `required`,
//! per-property `type` (a string or a list of strings), `enum`, and
//! `additionalProperties: false`.

use serde_json::Value;

use crate::message::ToolArguments;

/// Checks `args` against `schema`.
///
/// Returns `Ok(())` when valid, `Err(message)` describing the first violation found.
/// A schema that is not an object (e.g. `{}` or `null`) accepts everything.
pub fn validate_arguments(args: &ToolArguments, schema: &Value) -> Result<(), String> {
    if let Some(schema_type) = schema.get("type").and_then(Value::as_str) {
        if schema_type != "object" {
            return Err(format!(
                "tool schema must describe an object, found type '{}'",
                schema_type
            ));
        }
    }

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !args.contains_key(name) {
                return Err(format!("missing required field '{}'", name));
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);
    let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));

    for (key, value) in args {
        let prop_schema = match properties.and_then(|p| p.get(key)) {
            Some(p) => p,
            None if closed => return Err(format!("unexpected field '{}'", key)),
            None => continue,
        };
        if let Some(expected) = prop_schema.get("type") {
            if !type_matches(value, expected) {
                return Err(format!(
                    "field '{}' expected type {}, got {}",
                    key,
                    expected,
                    json_type_name(value)
                ));
            }
        }
        if let Some(allowed) = prop_schema.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                return Err(format!("field '{}' must be one of {}", key, Value::from(allowed.clone())));
            }
        }
    }

    Ok(())
}

fn type_matches(value: &Value, expected: &Value) -> bool {
    match expected {
        Value::String(t) => value_matches_type(value, t),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| value_matches_type(value, t)),
        _ => true,
    }
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
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
