//! Restricted comparator for operand expressions.
//!
//! An operand such as `department == 'Sales'` is interpreted with a fixed
//! grammar and nothing else:
//!
//! ```text
//! condition := term op term
//! op        := '==' | '!=' | '>' | '<' | '>=' | '<='
//! term      := identifier | number | 'string' | true | false | null
//! ```
//!
//! Identifiers are looked up in the caller's bindings. There is no attribute
//! access, no calls and no arithmetic.

use std::{cmp::Ordering, collections::HashMap};

use crate::{
    ast::{CompareOp, Token},
    evaluator::EvalError,
    lexer::tokenize,
    value::Value,
};

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Name resolved against the bindings
    Variable(String),
    /// Inline literal
    Literal(Value),
}

/// A parsed `term op term` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: Term,
    pub op: CompareOp,
    pub right: Term,
}

impl Condition {
    /// Parses a normalized operand expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use rule_ast::condition::{Condition, Term};
    /// use rule_ast::{CompareOp, Value};
    ///
    /// let cond = Condition::parse("age >= 18").unwrap();
    /// assert_eq!(cond.left, Term::Variable("age".to_string()));
    /// assert_eq!(cond.op, CompareOp::GreaterEqual);
    /// assert_eq!(cond.right, Term::Literal(Value::Integer(18)));
    /// ```
    pub fn parse(expr: &str) -> Result<Condition, EvalError> {
        if expr.trim().is_empty() {
            return Err(EvalError::EmptyRule);
        }

        let tokens = tokenize(expr);
        let [left, op, right] = tokens.as_slice() else {
            return Err(EvalError::InvalidCondition(expr.to_string()));
        };

        let op = match op {
            Token::Eq | Token::EqEq => CompareOp::Equal,
            Token::NotEq => CompareOp::NotEqual,
            Token::Lt => CompareOp::LessThan,
            Token::Gt => CompareOp::GreaterThan,
            Token::LtEq => CompareOp::LessEqual,
            Token::GtEq => CompareOp::GreaterEqual,
            other => return Err(EvalError::InvalidOperator(other.to_string())),
        };

        Ok(Condition {
            left: term(left, expr)?,
            op,
            right: term(right, expr)?,
        })
    }

    pub fn evaluate(&self, bindings: &HashMap<String, Value>) -> Result<bool, EvalError> {
        let left = resolve(&self.left, bindings)?;
        let right = resolve(&self.right, bindings)?;
        compare(self.op, left, right)
    }
}

fn term(token: &Token, expr: &str) -> Result<Term, EvalError> {
    match token {
        Token::Identifier(name) => Ok(match name.to_ascii_lowercase().as_str() {
            "true" => Term::Literal(Value::Boolean(true)),
            "false" => Term::Literal(Value::Boolean(false)),
            "null" => Term::Literal(Value::Null),
            _ => Term::Variable(name.clone()),
        }),
        Token::String(quoted) => {
            let inner = quoted
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .unwrap_or(quoted.as_str());
            Ok(Term::Literal(Value::String(inner.to_string())))
        }
        Token::Number(text) => number(text)
            .map(Term::Literal)
            .ok_or_else(|| EvalError::InvalidCondition(expr.to_string())),
        _ => Err(EvalError::InvalidCondition(expr.to_string())),
    }
}

fn number(text: &str) -> Option<Value> {
    if !text.contains('.')
        && let Ok(n) = text.parse::<i64>()
    {
        return Some(Value::Integer(n));
    }
    text.parse::<f64>().ok().map(Value::Float)
}

fn resolve<'a>(term: &'a Term, bindings: &'a HashMap<String, Value>) -> Result<&'a Value, EvalError> {
    match term {
        Term::Literal(value) => Ok(value),
        Term::Variable(name) => bindings
            .get(name)
            .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
    }
}

/// Numbers compare by value across integer/float; everything else only
/// supports `==` / `!=`, and values of different kinds are never equal.
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    if left.is_number() && right.is_number() {
        let ord = numeric_cmp(left, right);
        return Ok(match op {
            CompareOp::Equal => ord == Some(Ordering::Equal),
            CompareOp::NotEqual => ord != Some(Ordering::Equal),
            CompareOp::LessThan => ord == Some(Ordering::Less),
            CompareOp::GreaterThan => ord == Some(Ordering::Greater),
            CompareOp::LessEqual => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            CompareOp::GreaterEqual => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
        });
    }

    match op {
        CompareOp::Equal => Ok(left == right),
        CompareOp::NotEqual => Ok(left != right),
        _ => Err(EvalError::TypeMismatch {
            op,
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

fn numeric_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Integer(x), Value::Float(y)) => int_float_cmp(*x, *y),
        (Value::Float(x), Value::Integer(y)) => int_float_cmp(*y, *x).map(Ordering::reverse),
        _ => None,
    }
}

/// Orders an integer against a float without rounding either side.
///
/// Casting the i64 to f64 would lose bits above 2^53, so the float is split
/// into its integral part (exact as an i64 once range-checked) and fraction.
fn int_float_cmp(i: i64, f: f64) -> Option<Ordering> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return None;
    }
    if f >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if f < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)),
        ord => Some(ord),
    }
}
