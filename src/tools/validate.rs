//! Argument validation against a tool's declared parameters.
//!
//! Unknown arguments are rejected. An explicit JSON `null` is treated the
//! same as leaving the argument out.

use serde_json::{Map, Value};

use super::schema::{ParamSpec, ParamType, ToolDescriptor};
use crate::error::{ToolError, ToolOutcome};

/// Check `args` against `descriptor` and fill in defaults for omitted optionals.
pub fn validate(descriptor: &ToolDescriptor, args: &Value) -> ToolOutcome<Map<String, Value>> {
    let supplied = match args {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        _ => {
            return Err(ToolError::validation(
                "arguments",
                "must be a JSON object",
            ))
        }
    };

    if let Some(unknown) = supplied.keys().find(|k| descriptor.param(k).is_none()) {
        return Err(ToolError::validation(
            unknown.as_str(),
            format!("is not a parameter of tool '{}'", descriptor.name),
        ));
    }

    let mut accepted = Map::new();
    for spec in &descriptor.params {
        match supplied.get(spec.name).filter(|v| !v.is_null()) {
            Some(value) => {
                check_value(spec, value).map_err(|reason| ToolError::validation(spec.name, reason))?;
                accepted.insert(spec.name.to_string(), value.clone());
            }
            None if spec.required => {
                return Err(ToolError::validation(spec.name, "is required"));
            }
            None => {
                if let Some(default) = &spec.default {
                    accepted.insert(spec.name.to_string(), default.clone());
                }
            }
        }
    }
    Ok(accepted)
}

fn check_value(spec: &ParamSpec, value: &Value) -> Result<(), String> {
    let type_ok = match spec.kind {
        ParamType::String => value.is_string(),
        ParamType::Integer => value.is_i64() || value.is_u64(),
        ParamType::Number => value.is_number(),
        ParamType::Boolean => value.is_boolean(),
        ParamType::Object => value.is_object(),
        ParamType::Network => value.is_string() || value.is_i64(),
        ParamType::StringList => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        ParamType::IdentifierList => value
            .as_array()
            .is_some_and(|items| items.iter().all(|v| v.is_string() || v.is_i64())),
        ParamType::EdgeList => {
            let items = value.as_array().ok_or("must be an array of edges")?;
            for (i, edge) in items.iter().enumerate() {
                let ok = edge.as_array().is_some_and(|parts| {
                    (2..=3).contains(&parts.len()) && parts.iter().all(Value::is_string)
                });
                if !ok {
                    return Err(format!(
                        "edge {} must be [source, target] or [source, target, interaction]",
                        i
                    ));
                }
            }
            true
        }
    };
    if !type_ok {
        return Err(format!("must be {}", spec.kind.describe()));
    }

    if spec.non_empty {
        let empty = match value {
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if empty {
            return Err("must not be empty".into());
        }
    }

    if let Some(allowed) = spec.allowed {
        let given = value.as_str().unwrap_or_default();
        if !allowed.contains(&given) {
            return Err(format!("must be one of: {}", allowed.join(", ")));
        }
    }

    if let (Some((min, max)), Some(n)) = (spec.range, value.as_f64()) {
        if n < min || n > max {
            return Err(format!("must be between {} and {}", min, max));
        }
    }

    if let (Some(fields), Some(obj)) = (spec.fields, value.as_object()) {
        for (key, field) in obj {
            if !fields.contains(&key.as_str()) {
                return Err(format!(
                    "has unknown field '{}' (expected: {})",
                    key,
                    fields.join(", ")
                ));
            }
            if !field.is_string() {
                return Err(format!("field '{}' must be a string", key));
            }
        }
    }

    Ok(())
}
