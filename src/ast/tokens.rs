use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Delimiters
    /// Left parenthesis, opens a grouped `(left OP right)` expression
    LParen,

    /// Right parenthesis
    RParen,

    // Logical
    /// Logical AND (word, case-insensitive in the source)
    ///
    /// # Examples
    /// ```text
    /// (age > 30 AND department = 'Sales')
    /// (age > 30 and department = 'Sales')
    /// ```
    And,

    /// Logical OR (word, case-insensitive in the source)
    Or,

    // Comparison
    /// Single equals sign, normalized to `==` inside operands
    Eq,

    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Operands
    /// Variable name, a run of letters and underscores
    ///
    /// # Examples
    /// ```text
    /// age
    /// department
    /// _internal
    /// ```
    Identifier(String),

    /// Single-quoted string literal, quotes retained
    ///
    /// # Examples
    /// ```text
    /// 'Sales'
    /// 'Sales Team'
    /// ```
    String(String),

    /// Numeric literal as written in the source
    ///
    /// # Examples
    /// ```text
    /// 30
    /// 2.5
    /// ```
    Number(String),

    /// End of input
    Eof,
}

impl Token {
    /// True for `AND` / `OR`
    pub fn is_logical(&self) -> bool {
        matches!(self, Token::And | Token::Or)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Eq => write!(f, "="),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::Identifier(s) | Token::String(s) | Token::Number(s) => write!(f, "{}", s),
            Token::Eof => write!(f, "<end of input>"),
        }
    }
}
