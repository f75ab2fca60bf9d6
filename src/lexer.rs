use crate::ast::Token;

/// Splits a rule expression into tokens.
///
/// Characters that start no token (whitespace, stray punctuation, an
/// unterminated `'`) are skipped, so lexing never fails.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

/// Tokenizes a whole expression. `Eof` is not included.
///
/// # Examples
///
/// ```
/// use rule_ast::{tokenize, Token};
///
/// let tokens = tokenize("age > 30");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Identifier("age".to_string()),
///         Token::Gt,
///         Token::Number("30".to_string()),
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        match lexer.next_token() {
            Token::Eof => break,
            token => tokens.push(token),
        }
    }
    tokens
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn previous_char(&self, start: usize) -> Option<char> {
        start.checked_sub(1).and_then(|i| self.input.get(i).copied())
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphabetic() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads `'...'` with both quotes kept. Returns `None` (consuming only
    /// the opening quote) when there is no closing quote.
    fn read_string(&mut self) -> Option<String> {
        let close = self.input[self.position + 1..]
            .iter()
            .position(|&c| c == '\'')?;
        let end = self.position + 1 + close;
        let literal: String = self.input[self.position..=end].iter().collect();
        self.position = end + 1;
        Some(literal)
    }

    fn read_number(&mut self) -> String {
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        number
    }

    /// Consumes one or two characters and returns `token`.
    fn operator(&mut self, width: usize, token: Token) -> Token {
        self.position += width;
        token
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            let Some(ch) = self.current_char() else {
                return Token::Eof;
            };
            let next = self.peek_char(1);

            match ch {
                '(' => return self.operator(1, Token::LParen),
                ')' => return self.operator(1, Token::RParen),
                '>' if next == Some('=') => return self.operator(2, Token::GtEq),
                '>' => return self.operator(1, Token::Gt),
                '<' if next == Some('=') => return self.operator(2, Token::LtEq),
                '<' => return self.operator(1, Token::Lt),
                '=' if next == Some('=') => return self.operator(2, Token::EqEq),
                '=' => return self.operator(1, Token::Eq),
                '!' if next == Some('=') => return self.operator(2, Token::NotEq),
                '\'' => match self.read_string() {
                    Some(literal) => return Token::String(literal),
                    None => self.advance(),
                },
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let start = self.position;
                    let word = self.read_word();
                    // `and`/`or` only count as keywords on word boundaries
                    let bounded = !self.previous_char(start).is_some_and(is_word_char)
                        && !self.current_char().is_some_and(is_word_char);
                    return match word.to_ascii_lowercase().as_str() {
                        "and" if bounded => Token::And,
                        "or" if bounded => Token::Or,
                        _ => Token::Identifier(word),
                    };
                }
                c if c.is_ascii_digit() => return Token::Number(self.read_number()),
                _ => self.advance(),
            }
        }
    }
}

#[test]
fn test_keywords_any_case() {
    let mut lexer = Lexer::new("and OR And oR");
    assert_eq!(lexer.next_token(), Token::And);
    assert_eq!(lexer.next_token(), Token::Or);
    assert_eq!(lexer.next_token(), Token::And);
    assert_eq!(lexer.next_token(), Token::Or);
    assert_eq!(lexer.next_token(), Token::Eof);
}

#[test]
fn test_grouped_condition() {
    let mut lexer = Lexer::new("(age >= 18 AND name != 'Bob')");
    assert_eq!(lexer.next_token(), Token::LParen);
    assert_eq!(lexer.next_token(), Token::Identifier("age".to_string()));
    assert_eq!(lexer.next_token(), Token::GtEq);
    assert_eq!(lexer.next_token(), Token::Number("18".to_string()));
    assert_eq!(lexer.next_token(), Token::And);
    assert_eq!(lexer.next_token(), Token::Identifier("name".to_string()));
    assert_eq!(lexer.next_token(), Token::NotEq);
    assert_eq!(lexer.next_token(), Token::String("'Bob'".to_string()));
    assert_eq!(lexer.next_token(), Token::RParen);
    assert_eq!(lexer.next_token(), Token::Eof);
}
