//! Rules files: a TOML description of rules to load into a [`RuleStore`].
//!
//! ```toml
//! [[rule]]
//! name = "rule1"
//! expression = "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing'))"
//!
//! [[rule]]
//! name = "rule2"
//! expression = "(salary > 50000 OR experience > 5)"
//!
//! [[combine]]
//! name = "both"
//! left = "rule1"
//! right = "rule2"
//! operator = "AND"
//! ```
//!
//! All `[[rule]]` entries are created first, in file order, then every
//! `[[combine]]` entry in file order, so a combination may refer to rules
//! defined anywhere in the file and to combinations listed before it.

use std::{fmt, io, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::store::{RuleError, RuleStore};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RulesFile {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,
    #[serde(default, rename = "combine")]
    pub combinations: Vec<CombineDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleDef {
    pub name: String,
    pub expression: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CombineDef {
    pub name: String,
    pub left: String,
    pub right: String,
    /// `AND` or `OR`
    #[serde(default = "default_operator")]
    pub operator: String,
}

fn default_operator() -> String {
    "AND".to_string()
}

/// Errors raised while loading a rules file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io(io::Error),
    /// The file is not valid TOML for [`RulesFile`]
    Toml(toml::de::Error),
    /// An entry failed to create or combine
    Rule { name: String, source: RuleError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Cannot read rules file: {}", e),
            ConfigError::Toml(e) => write!(f, "Invalid rules file: {}", e),
            ConfigError::Rule { name, source } => write!(f, "Rule '{}': {}", name, source),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Toml(e) => Some(e),
            ConfigError::Rule { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

impl RulesFile {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let file = Self::from_toml(&content)?;
        info!(
            "loaded {} rule(s) and {} combination(s) from {}",
            file.rules.len(),
            file.combinations.len(),
            path.display()
        );
        Ok(file)
    }

    /// Creates every rule, then every combination, stopping at the first failure.
    pub fn apply(&self, store: &RuleStore) -> Result<(), ConfigError> {
        for rule in &self.rules {
            store
                .create(&rule.name, &rule.expression)
                .map_err(|source| ConfigError::Rule {
                    name: rule.name.clone(),
                    source,
                })?;
        }

        for combo in &self.combinations {
            store
                .combine(&combo.left, &combo.right, &combo.operator, &combo.name)
                .map_err(|source| ConfigError::Rule {
                    name: combo.name.clone(),
                    source,
                })?;
        }

        Ok(())
    }

    /// Loads `path` into a fresh store.
    pub fn load_store(path: &Path) -> Result<RuleStore, ConfigError> {
        let store = RuleStore::new();
        Self::load(path)?.apply(&store)?;
        Ok(store)
    }
}
