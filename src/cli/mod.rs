//! CLI support for rule-ast
//!
//! Provides programmatic access to the command-line operations so they can be
//! driven from tests or embedded in other tools.

mod check;
mod convert;
mod eval;

pub use check::{CheckOptions, execute_check};
pub use convert::bindings_from_json;
pub use eval::{EvalOptions, RunOptions, execute_eval, execute_run, list_rules};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Rule creation, combination or evaluation failed
    Rule(crate::RuleError),
    /// Rules file could not be loaded
    Config(crate::ConfigError),
    /// JSON parsing or printing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
    /// Bindings were valid JSON but not an object
    InvalidBindings(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Rule(e) => write!(f, "{}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Use --input or pipe JSON to stdin."),
            CliError::InvalidBindings(kind) => {
                write!(f, "Input must be a JSON object mapping names to values, got {}", kind)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Rule(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::RuleError> for CliError {
    fn from(e: crate::RuleError) -> Self {
        CliError::Rule(e)
    }
}

impl From<crate::ConfigError> for CliError {
    fn from(e: crate::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
