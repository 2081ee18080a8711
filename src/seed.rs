//! Seeding a [`State`] from documents and `key=value` assignments
//!
//! A seed document is a JSON or YAML object; each top-level field becomes one
//! entry. Values convert through `StateValue::from(serde_json::Value)`.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::StateError;
use crate::store::State;
use crate::value::StateValue;

/// Build a state from a JSON object
pub fn from_json_str(input: &str) -> Result<State, StateError> {
    let document: Value = serde_json::from_str(input)?;
    from_document(document)
}

/// Build a state from a YAML mapping
pub fn from_yaml_str(input: &str) -> Result<State, StateError> {
    let document: Value = serde_yaml::from_str(input)?;
    from_document(document)
}

/// Build a state from an already-parsed document
pub fn from_document(document: Value) -> Result<State, StateError> {
    match document {
        Value::Object(fields) => Ok(fields.into_iter().collect()),
        other => Err(StateError::InvalidSeed {
            details: format!("expected an object at top level, found {}", json_kind(&other)),
        }),
    }
}

/// Read a seed file; `.yaml`/`.yml` parse as YAML, everything else as JSON
pub fn from_path(path: &Path) -> Result<State, StateError> {
    let contents = fs::read_to_string(path)?;
    let state = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => from_yaml_str(&contents)?,
        _ => from_json_str(&contents)?,
    };
    debug!(path = %path.display(), entries = state.len(), "seeded state");
    Ok(state)
}

/// Parse `key=value`, inferring the value's type (see [`infer_value`])
pub fn parse_assignment(input: &str) -> Result<(String, StateValue), StateError> {
    let invalid = || StateError::InvalidAssignment {
        input: input.to_string(),
    };

    let (key, raw) = input.split_once('=').ok_or_else(invalid)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(invalid());
    }
    Ok((key.to_string(), infer_value(raw)))
}

/// `null`, `true`/`false`, then the narrowest of int/long, then a finite
/// float, else the raw text as a string.
pub fn infer_value(raw: &str) -> StateValue {
    match raw {
        "null" => StateValue::Null,
        "true" => StateValue::Bool(true),
        "false" => StateValue::Bool(false),
        _ => {
            if let Ok(i) = raw.parse::<i32>() {
                StateValue::Int(i)
            } else if let Ok(l) = raw.parse::<i64>() {
                StateValue::Long(l)
            } else if let Some(x) = raw.parse::<f64>().ok().filter(|x| x.is_finite()) {
                StateValue::Float(x)
            } else {
                StateValue::Str(raw.to_string())
            }
        }
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
