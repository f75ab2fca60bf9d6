//! Named rule storage.
//!
//! A [`RuleStore`] maps rule names to parsed trees. Combining two rules does
//! not copy them: the new root points at the stored roots, so a subtree can be
//! reachable from several names at once. Stored trees are therefore never
//! mutated, and entries are never removed.
//!
//! Every entry records its tree depth. A combine that would produce a tree
//! deeper than the store's limit is refused, which keeps evaluation,
//! printing and drop of stored trees within a bounded recursion.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use log::debug;

use crate::{
    ast::{AstNode, LogicalOp},
    evaluator::{EvalError, evaluate},
    parser::{ParseError, parse_rule},
    value::Value,
};

/// Errors surfaced by [`RuleStore`] operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    /// The rule expression did not parse
    Parse(ParseError),

    /// A referenced rule name is not in the store
    RuleNotFound(String),

    /// Combine operator other than `AND` / `OR`
    InvalidOperator(String),

    /// The rule was found but could not be evaluated
    Eval(EvalError),

    /// Storing the rule would exceed the store's tree depth limit
    NestingTooDeep {
        name: String,
        depth: usize,
        max: usize,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::Parse(e) => write!(f, "Parse error: {}", e),
            RuleError::RuleNotFound(name) => write!(f, "Rule '{}' not found", name),
            RuleError::InvalidOperator(op) => {
                write!(f, "Invalid operator '{}' (expected AND or OR)", op)
            }
            RuleError::Eval(e) => write!(f, "Evaluation error: {}", e),
            RuleError::NestingTooDeep { name, depth, max } => write!(
                f,
                "Rule '{}' would be {} levels deep (limit is {})",
                name, depth, max
            ),
        }
    }
}

impl std::error::Error for RuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuleError::Parse(e) => Some(e),
            RuleError::Eval(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for RuleError {
    fn from(e: ParseError) -> Self {
        RuleError::Parse(e)
    }
}

impl From<EvalError> for RuleError {
    fn from(e: EvalError) -> Self {
        RuleError::Eval(e)
    }
}

/// Thread-safe map from rule name to rule tree.
///
/// Writers (`create`, `combine`) take an exclusive lock; readers share it.
///
/// # Examples
///
/// ```
/// use rule_ast::{RuleStore, Value};
/// use std::collections::HashMap;
///
/// let store = RuleStore::new();
/// store.create("senior", "age > 30").unwrap();
/// store.create("sales", "department = 'Sales'").unwrap();
/// store.combine("senior", "sales", "AND", "senior_sales").unwrap();
///
/// let mut data = HashMap::new();
/// data.insert("age".to_string(), Value::Integer(42));
/// data.insert("department".to_string(), Value::from("Sales"));
/// assert!(store.evaluate("senior_sales", &data).unwrap());
/// ```
#[derive(Debug)]
pub struct RuleStore {
    rules: RwLock<HashMap<String, StoredRule>>,
    max_depth: usize,
}

/// Deepest tree [`RuleStore::new`] will hold.
///
/// Any tree the parser accepts fits, with room for several levels of
/// combining on top.
pub const MAX_RULE_DEPTH: usize = 512;

#[derive(Debug, Clone)]
struct StoredRule {
    root: Arc<AstNode>,
    depth: usize,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::with_max_depth(MAX_RULE_DEPTH)
    }
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses trees more than `max_depth` levels deep.
    pub fn with_max_depth(max_depth: usize) -> Self {
        RuleStore {
            rules: RwLock::new(HashMap::new()),
            max_depth,
        }
    }

    fn check_depth(&self, name: &str, depth: usize) -> Result<(), RuleError> {
        if depth > self.max_depth {
            return Err(RuleError::NestingTooDeep {
                name: name.to_string(),
                depth,
                max: self.max_depth,
            });
        }
        Ok(())
    }

    /// Parses `expression` and stores it under `name`, replacing any
    /// previous rule of that name.
    pub fn create(&self, name: &str, expression: &str) -> Result<Arc<AstNode>, RuleError> {
        let root = Arc::new(parse_rule(expression)?);
        let depth = root.depth();
        self.check_depth(name, depth)?;

        let entry = StoredRule {
            root: Arc::clone(&root),
            depth,
        };
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        if rules.insert(name.to_string(), entry).is_some() {
            debug!("replaced rule '{}'", name);
        } else {
            debug!("created rule '{}'", name);
        }

        Ok(root)
    }

    /// Stores `(name1 op name2)` under `combined_name`.
    ///
    /// Both source rules must exist. If `combined_name` is already taken the
    /// existing root is returned untouched. The new tree must fit within the
    /// store's depth limit.
    pub fn combine(
        &self,
        name1: &str,
        name2: &str,
        op: &str,
        combined_name: &str,
    ) -> Result<Arc<AstNode>, RuleError> {
        let op: LogicalOp = op.parse().map_err(RuleError::InvalidOperator)?;

        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);

        let left = rules
            .get(name1)
            .cloned()
            .ok_or_else(|| RuleError::RuleNotFound(name1.to_string()))?;
        let right = rules
            .get(name2)
            .cloned()
            .ok_or_else(|| RuleError::RuleNotFound(name2.to_string()))?;

        if let Some(existing) = rules.get(combined_name) {
            debug!(
                "combined rule '{}' already exists, keeping it",
                combined_name
            );
            return Ok(Arc::clone(&existing.root));
        }

        let depth = 1 + left.depth.max(right.depth);
        self.check_depth(combined_name, depth)?;

        let root = Arc::new(AstNode::operator(op, left.root, right.root));
        rules.insert(
            combined_name.to_string(),
            StoredRule {
                root: Arc::clone(&root),
                depth,
            },
        );
        debug!(
            "combined '{}' {} '{}' as '{}'",
            name1, op, name2, combined_name
        );

        Ok(root)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<AstNode>> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|entry| Arc::clone(&entry.root))
    }

    /// Evaluates the rule stored under `name`.
    pub fn evaluate(&self, name: &str, bindings: &HashMap<String, Value>) -> Result<bool, RuleError> {
        let root = self
            .lookup(name)
            .ok_or_else(|| RuleError::RuleNotFound(name.to_string()))?;
        Ok(evaluate(&root, bindings)?)
    }

    /// Stored rule names, sorted
    pub fn names(&self) -> Vec<String> {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = rules.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
