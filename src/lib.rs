pub mod ast;
pub mod condition;
pub mod config;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod store;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{AstNode, CompareOp, LogicalOp, NodeType, SerializedNode, Token};
pub use config::{ConfigError, RulesFile};
pub use evaluator::{EvalError, Evaluator, evaluate};
pub use lexer::{Lexer, tokenize};
pub use output::{to_infix, to_json, to_json_pretty};
pub use parser::{MAX_NESTING, ParseError, Parser, parse, parse_rule};
pub use store::{MAX_RULE_DEPTH, RuleError, RuleStore};
pub use value::Value;
