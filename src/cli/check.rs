//! Parse a rule expression and show the resulting tree

use super::CliError;
use crate::{
    RuleStore,
    output::{to_infix, to_infix_pretty, to_json, to_json_pretty},
};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The rule expression to parse
    pub expression: String,
    /// Pretty-print the output
    pub pretty: bool,
    /// Print the normalized expression instead of the JSON tree
    pub infix: bool,
}

/// Create the rule and render it
pub fn execute_check(options: &CheckOptions) -> Result<String, CliError> {
    let store = RuleStore::new();
    let root = store.create("check", &options.expression)?;

    let rendered = match (options.infix, options.pretty) {
        (true, false) => to_infix(&root),
        (true, true) => to_infix_pretty(&root),
        (false, false) => to_json(&root)?,
        (false, true) => to_json_pretty(&root)?,
    };
    Ok(rendered)
}
