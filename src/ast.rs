//! # Rule AST
//!
//! This module defines the tree produced by parsing a rule expression and the
//! tokens the parser consumes.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Logical (`AND`/`OR`) and comparison operators
//! - **[node]** - The binary tree itself and its serialized transport form
//!
//! ## Grammar
//!
//! ```text
//! expression  := '(' expression LOGOP expression ')'
//!              | operand_run
//! operand_run := token+ until ')' or LOGOP
//! LOGOP       := 'AND' | 'OR'
//! ```
//!
//! A parenthesized group always holds exactly two sub-expressions, so nesting
//! is how precedence is expressed:
//!
//! ```text
//! ((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing'))
//! ```
//!
//! Operand runs are kept as normalized text (`age = 30` becomes `age == 30`)
//! and only interpreted at evaluation time, by the restricted comparator in
//! [`crate::condition`].
pub mod node;
pub mod operators;
pub mod tokens;

pub use node::{AstNode, NodeType, SerializedNode};
pub use operators::{CompareOp, LogicalOp};
pub use tokens::Token;
