use std::{fmt, sync::Arc};

use log::warn;

use crate::{
    ast::{AstNode, LogicalOp, Token},
    lexer::tokenize,
};

/// Errors raised while building a tree from tokens.
///
/// Positions are token indices.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// No tokens at all
    EmptyInput,

    /// A `(` whose group never closes
    MismatchedParentheses { position: usize },

    /// Something other than `AND` / `OR` between two grouped sub-expressions
    InvalidOperator { found: String, position: usize },

    /// An operand run with no tokens, e.g. `(AND x > 1)`
    EmptyOperand { position: usize },

    /// Input ended where a sub-expression was required
    UnexpectedEnd,

    /// A `(` opened more groups than the parser's nesting limit allows
    NestingTooDeep { position: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "Empty rule expression"),
            ParseError::MismatchedParentheses { position } => {
                write!(f, "Mismatched parentheses: '(' at token {} is never closed", position)
            }
            ParseError::InvalidOperator { found, position } => write!(
                f,
                "Invalid operator '{}' at token {} (expected AND or OR)",
                found, position
            ),
            ParseError::EmptyOperand { position } => {
                write!(f, "Expected a condition at token {}", position)
            }
            ParseError::UnexpectedEnd => write!(f, "Unexpected end of rule expression"),
            ParseError::NestingTooDeep { position } => write!(
                f,
                "Groups nested too deeply: '(' at token {} exceeds the nesting limit",
                position
            ),
        }
    }
}

impl std::error::Error for ParseError {}

static EOF: Token = Token::Eof;

/// Deepest run of open groups [`Parser::new`] accepts.
pub const MAX_NESTING: usize = 256;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_max_depth(tokens, MAX_NESTING)
    }

    /// Parser that rejects more than `max_depth` simultaneously open groups.
    pub fn with_max_depth(tokens: Vec<Token>, max_depth: usize) -> Self {
        Parser {
            tokens,
            position: 0,
            depth: 0,
            max_depth,
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&EOF)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    /// Parses one top-level expression. Tokens after it are ignored.
    pub fn parse(&mut self) -> Result<AstNode, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let node = self.parse_expression()?;

        if self.position < self.tokens.len() {
            warn!(
                "ignoring {} trailing token(s) starting at token {}: '{}'",
                self.tokens.len() - self.position,
                self.position,
                self.current()
            );
        }

        Ok(node)
    }

    fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        if self.check(&Token::LParen) {
            self.parse_group()
        } else {
            self.parse_operand()
        }
    }

    fn parse_group(&mut self) -> Result<AstNode, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                position: self.position,
            });
        }

        self.depth += 1;
        let result = self.parse_group_body();
        self.depth -= 1;
        result
    }

    /// `'(' expression LOGOP expression ')'`
    fn parse_group_body(&mut self) -> Result<AstNode, ParseError> {
        let open = self.position;
        self.advance(); // consume '('

        let left = self.parse_expression()?;

        let op = match self.current() {
            Token::And => LogicalOp::And,
            Token::Or => LogicalOp::Or,
            // `(cond)` is a redundant group around a single expression
            Token::RParen => {
                self.advance();
                return Ok(left);
            }
            Token::Eof => return Err(ParseError::MismatchedParentheses { position: open }),
            other => {
                return Err(ParseError::InvalidOperator {
                    found: other.to_string(),
                    position: self.position,
                });
            }
        };
        self.advance();

        let right = self.parse_expression()?;

        if !self.check(&Token::RParen) {
            return Err(ParseError::MismatchedParentheses { position: open });
        }
        self.advance();

        Ok(AstNode::operator(op, Arc::new(left), Arc::new(right)))
    }

    /// Greedy run of tokens up to `)`, a logical operator, or the end.
    fn parse_operand(&mut self) -> Result<AstNode, ParseError> {
        let start = self.position;
        let mut parts = Vec::new();

        loop {
            match self.current() {
                Token::Eof | Token::RParen => break,
                token if token.is_logical() => break,
                Token::Eq => parts.push("==".to_string()),
                token => parts.push(token.to_string()),
            }
            self.advance();
        }

        if parts.is_empty() {
            return Err(match self.current() {
                Token::Eof => ParseError::UnexpectedEnd,
                _ => ParseError::EmptyOperand { position: start },
            });
        }

        Ok(AstNode::operand(parts.join(" ")))
    }
}

/// Builds a tree from an already tokenized expression.
pub fn parse(tokens: Vec<Token>) -> Result<AstNode, ParseError> {
    Parser::new(tokens).parse()
}

/// Tokenizes and parses a rule expression.
///
/// # Examples
///
/// ```
/// use rule_ast::{parse_rule, AstNode};
///
/// let node = parse_rule("age = 30").unwrap();
/// assert_eq!(node, AstNode::operand("age == 30"));
/// ```
pub fn parse_rule(text: &str) -> Result<AstNode, ParseError> {
    parse(tokenize(text))
}
