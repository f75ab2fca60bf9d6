//! Evaluate rules against JSON bindings

use std::path::{Path, PathBuf};

use serde_json::json;

use super::{CliError, bindings_from_json};
use crate::{RuleStore, RulesFile};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The rule expression to evaluate
    pub expression: String,
    /// JSON object of bindings
    pub input: Option<String>,
}

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// TOML rules file
    pub rules: PathBuf,
    /// Name of the rule to evaluate
    pub name: String,
    /// JSON object of bindings
    pub input: Option<String>,
}

/// Evaluate a one-off expression. Output: `{"result": bool}`
pub fn execute_eval(options: &EvalOptions) -> Result<serde_json::Value, CliError> {
    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let bindings = bindings_from_json(input)?;

    let store = RuleStore::new();
    store.create("eval", &options.expression)?;
    let result = store.evaluate("eval", &bindings)?;

    Ok(json!({ "result": result }))
}

/// Evaluate a named rule from a rules file. Output: `{"rule": name, "result": bool}`
pub fn execute_run(options: &RunOptions) -> Result<serde_json::Value, CliError> {
    let store = RulesFile::load_store(&options.rules)?;

    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let bindings = bindings_from_json(input)?;
    let result = store.evaluate(&options.name, &bindings)?;

    Ok(json!({ "rule": options.name, "result": result }))
}

/// Every rule in a rules file, keyed by name, as serialized nodes
pub fn list_rules(rules: &Path) -> Result<serde_json::Value, CliError> {
    let store = RulesFile::load_store(rules)?;

    let mut out = serde_json::Map::new();
    for name in store.names() {
        if let Some(root) = store.lookup(&name) {
            out.insert(name, serde_json::to_value(root.to_serializable())?);
        }
    }
    Ok(serde_json::Value::Object(out))
}
