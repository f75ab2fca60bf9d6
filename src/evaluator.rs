use std::{collections::HashMap, fmt};

use log::trace;

use crate::{
    ast::{AstNode, CompareOp, LogicalOp},
    condition::Condition,
    value::Value,
};

/// Errors that can occur while evaluating a rule.
///
/// None of these fall back to `false`; a rule either evaluates cleanly or
/// reports why it could not.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A variable referenced by a condition is missing from the bindings
    UnboundVariable(String),

    /// Ordering comparison between values that are not both numbers
    TypeMismatch {
        op: CompareOp,
        left: &'static str,
        right: &'static str,
    },

    /// Unknown comparison operator in a condition
    InvalidOperator(String),

    /// Operand text that is not `term op term`
    InvalidCondition(String),

    /// No rule tree, or an operand with no expression
    EmptyRule,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundVariable(name) => {
                write!(f, "Unbound variable: '{}' is not in the supplied data", name)
            }
            EvalError::TypeMismatch { op, left, right } => write!(
                f,
                "Type mismatch: cannot compare {} {} {} (ordering requires numeric types)",
                left, op, right
            ),
            EvalError::InvalidOperator(op) => write!(f, "Invalid operator: '{}'", op),
            EvalError::InvalidCondition(expr) => write!(
                f,
                "Invalid condition: '{}' (expected <name> <op> <value>)",
                expr
            ),
            EvalError::EmptyRule => write!(f, "Empty rule"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Walks a rule tree against a set of variable bindings.
pub struct Evaluator<'a> {
    bindings: &'a HashMap<String, Value>,
}

impl<'a> Evaluator<'a> {
    pub fn new(bindings: &'a HashMap<String, Value>) -> Self {
        Evaluator { bindings }
    }

    /// Evaluates a tree to a boolean.
    ///
    /// `AND` / `OR` short-circuit: the right subtree is not visited when the
    /// left one already decides the result, so a variable used only there
    /// need not be bound.
    ///
    /// Recursion follows the tree depth. Trees from the parser or a
    /// [`RuleStore`](crate::RuleStore) are depth-limited; hand-built trees
    /// are the caller's responsibility.
    ///
    /// # Examples
    ///
    /// ```
    /// use rule_ast::{parse_rule, Evaluator, Value};
    /// use std::collections::HashMap;
    ///
    /// let rule = parse_rule("(age > 30 AND department = 'Sales')").unwrap();
    ///
    /// let mut data = HashMap::new();
    /// data.insert("age".to_string(), Value::Integer(35));
    /// data.insert("department".to_string(), Value::from("Sales"));
    ///
    /// assert!(Evaluator::new(&data).evaluate(&rule).unwrap());
    /// ```
    pub fn evaluate(&self, node: &AstNode) -> Result<bool, EvalError> {
        match node {
            AstNode::Operator { op, left, right } => {
                let left = self.evaluate(left)?;
                match op {
                    LogicalOp::And => Ok(left && self.evaluate(right)?),
                    LogicalOp::Or => Ok(left || self.evaluate(right)?),
                }
            }
            AstNode::Operand { expr } => {
                let result = Condition::parse(expr)?.evaluate(self.bindings)?;
                trace!("{} => {}", expr, result);
                Ok(result)
            }
        }
    }

    /// Like [`Evaluator::evaluate`], but an absent root is an error rather than `false`.
    pub fn evaluate_root(&self, root: Option<&AstNode>) -> Result<bool, EvalError> {
        self.evaluate(root.ok_or(EvalError::EmptyRule)?)
    }
}

/// Evaluates `node` against `bindings`.
pub fn evaluate(node: &AstNode, bindings: &HashMap<String, Value>) -> Result<bool, EvalError> {
    Evaluator::new(bindings).evaluate(node)
}
