//! Rendering of rule trees.
//!
//! Two forms are provided:
//!
//! - **JSON** via [`to_json()`] / [`to_json_pretty()`] - the serialized node
//!   shape (`type`, `value`, `left`, `right`) callers exchange trees in
//! - **Infix text** via [`to_infix()`] / [`to_infix_pretty()`] - a rule
//!   expression that parses back into the same tree
//!
//! # Examples
//!
//! ```
//! use rule_ast::parse_rule;
//! use rule_ast::output::to_infix;
//!
//! let node = parse_rule("((a = 1 and b > 2) or c < 3)").unwrap();
//! assert_eq!(to_infix(&node), "((a == 1 AND b > 2) OR c < 3)");
//! ```

use crate::ast::AstNode;

pub struct InfixPrinter {
    pretty: bool,
}

impl InfixPrinter {
    pub fn new(pretty: bool) -> Self {
        InfixPrinter { pretty }
    }

    pub fn print(&self, node: &AstNode) -> String {
        self.print_node(node, 0)
    }

    fn print_node(&self, node: &AstNode, indent: usize) -> String {
        match node {
            AstNode::Operand { expr } => expr.clone(),
            AstNode::Operator { op, left, right } => {
                if self.pretty {
                    format!(
                        "(\n{inner}{left}\n{inner}{op}\n{inner}{right}\n{outer})",
                        inner = self.indent(indent + 1),
                        outer = self.indent(indent),
                        left = self.print_node(left, indent + 1),
                        right = self.print_node(right, indent + 1),
                    )
                } else {
                    format!(
                        "({} {} {})",
                        self.print_node(left, indent),
                        op,
                        self.print_node(right, indent)
                    )
                }
            }
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }
}

/// Renders a tree as a single-line rule expression.
pub fn to_infix(node: &AstNode) -> String {
    InfixPrinter::new(false).print(node)
}

/// Renders a tree as a rule expression with one operand or operator per
/// line and 2-space indentation per nesting level.
pub fn to_infix_pretty(node: &AstNode) -> String {
    InfixPrinter::new(true).print(node)
}

/// Compact JSON of the serialized node
pub fn to_json(node: &AstNode) -> Result<String, serde_json::Error> {
    serde_json::to_string(&node.to_serializable())
}

/// Pretty-printed JSON of the serialized node
pub fn to_json_pretty(node: &AstNode) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&node.to_serializable())
}
