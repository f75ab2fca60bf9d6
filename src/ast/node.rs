use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::LogicalOp;

/// A node of a parsed rule.
///
/// Children are shared handles: combining two stored rules builds a new
/// operator node over the *same* subtrees rather than copies of them, so a
/// tree must never be mutated once it has been handed out. Use
/// [`Arc::ptr_eq`] when node identity matters; `PartialEq` compares structure.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Two subtrees joined by `AND` / `OR`
    ///
    /// # Example
    /// ```text
    /// (age > 30 AND department = 'Sales')
    /// ```
    Operator {
        op: LogicalOp,
        left: Arc<AstNode>,
        right: Arc<AstNode>,
    },

    /// A single normalized comparison
    ///
    /// # Example
    /// ```text
    /// age == 30
    /// department == 'Sales'
    /// ```
    Operand { expr: String },
}

impl AstNode {
    pub fn operator(op: LogicalOp, left: Arc<AstNode>, right: Arc<AstNode>) -> Self {
        AstNode::Operator { op, left, right }
    }

    pub fn operand(expr: impl Into<String>) -> Self {
        AstNode::Operand { expr: expr.into() }
    }

    /// Converts the tree into its transport shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use rule_ast::AstNode;
    ///
    /// let node = AstNode::operand("age > 30").to_serializable();
    /// let json = serde_json::to_string(&node).unwrap();
    /// assert_eq!(json, r#"{"type":"operand","value":"age > 30","left":null,"right":null}"#);
    /// ```
    pub fn to_serializable(&self) -> SerializedNode {
        match self {
            AstNode::Operator { op, left, right } => SerializedNode {
                node_type: NodeType::Operator,
                value: Some(op.as_str().to_string()),
                left: Some(Box::new(left.to_serializable())),
                right: Some(Box::new(right.to_serializable())),
            },
            AstNode::Operand { expr } => SerializedNode {
                node_type: NodeType::Operand,
                value: Some(expr.clone()),
                left: None,
                right: None,
            },
        }
    }

    /// Operand expressions in left-to-right order
    pub fn operands(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_operands(&mut out);
        out
    }

    fn collect_operands<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            AstNode::Operator { left, right, .. } => {
                left.collect_operands(out);
                right.collect_operands(out);
            }
            AstNode::Operand { expr } => out.push(expr),
        }
    }

    /// Number of levels; a lone operand has depth 1
    pub fn depth(&self) -> usize {
        match self {
            AstNode::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
            AstNode::Operand { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Operator,
    Operand,
}

/// Transport view of an [`AstNode`].
///
/// Field names are fixed: `type`, `value`, `left`, `right`. Leaves carry
/// `null` children, operators carry `"AND"` / `"OR"` as their value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub value: Option<String>,
    pub left: Option<Box<SerializedNode>>,
    pub right: Option<Box<SerializedNode>>,
}
