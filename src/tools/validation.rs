//! Registration-time spec checks and per-value type checks.

use std::collections::HashSet;

use super::types::{ParameterSpec, ParameterType, ToolSpec};
use crate::error::{HeartloopError, Result};

/// Check a spec once, when it is registered.
///
/// Rejects empty names, duplicate parameter names, required names that are
/// not declared, and enums on non-string parameters.
pub fn validate_spec(spec: &ToolSpec) -> Result<()> {
    let invalid = |message: String| HeartloopError::InvalidToolSpec {
        tool: spec.name.clone(),
        message,
    };

    if spec.name.trim().is_empty() {
        return Err(invalid("tool name is empty".into()));
    }

    let mut seen = HashSet::new();
    for parameter in &spec.parameters {
        if !seen.insert(parameter.name.as_str()) {
            return Err(invalid(format!("duplicate parameter '{}'", parameter.name)));
        }
        if parameter.allowed.is_some() && parameter.kind != ParameterType::String {
            return Err(invalid(format!(
                "parameter '{}' declares allowed values but is not a string",
                parameter.name
            )));
        }
    }

    for required in &spec.required {
        if !seen.contains(required.as_str()) {
            return Err(invalid(format!("required parameter '{required}' is not declared")));
        }
    }

    Ok(())
}

/// Check one argument value against its declaration.
pub fn check_value(parameter: &ParameterSpec, value: &serde_json::Value) -> std::result::Result<(), String> {
    if !value_matches_type(value, parameter.kind) {
        return Err(format!(
            "expected type '{}', got {}",
            parameter.kind,
            json_type_name(value)
        ));
    }
    if let (Some(allowed), Some(s)) = (&parameter.allowed, value.as_str()) {
        if !allowed.iter().any(|a| a == s) {
            return Err(format!("'{s}' is not one of [{}]", allowed.join(", ")));
        }
    }
    Ok(())
}

fn value_matches_type(value: &serde_json::Value, expected: ParameterType) -> bool {
    match expected {
        ParameterType::String => value.is_string(),
        ParameterType::Number => value.is_number(),
        ParameterType::Integer => value.is_i64() || value.is_u64(),
        ParameterType::Boolean => value.is_boolean(),
        ParameterType::Object => value.is_object(),
        ParameterType::Array => value.is_array(),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
