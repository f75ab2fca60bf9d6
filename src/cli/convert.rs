//! JSON -> evaluation bindings

use std::collections::HashMap;

use super::CliError;
use crate::Value;

/// Parse a JSON object into variable bindings.
pub fn bindings_from_json(json: &str) -> Result<HashMap<String, Value>, CliError> {
    match serde_json::from_str::<serde_json::Value>(json)? {
        serde_json::Value::Object(obj) => Ok(obj
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()),
        other => Err(CliError::InvalidBindings(Value::from(other).type_name())),
    }
}
