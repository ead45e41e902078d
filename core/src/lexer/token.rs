use core::fmt;

/// Two-character operators, matched before single-character ones.
pub const TWO_CHAR_OPERATORS: [&str; 6] = ["==", "!=", ">=", "<=", "&&", "||"];

/// Single-character operators.
pub const SINGLE_CHAR_OPERATORS: [char; 11] =
    ['+', '-', '*', '/', '%', '=', '!', '<', '>', '&', '|'];

/// Operators that may appear in prefix position.
pub const PREFIX_OPERATORS: [&str; 2] = ["!", "-"];

pub fn is_operator_char(c: char) -> bool {
    SINGLE_CHAR_OPERATORS.contains(&c)
}

/// Source location of a token, 1-based line and column plus byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} col {}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Operator,
    LParen,
    RParen,
    Dot,
    Comma,
    Eof,
}

impl TokenKind {
    /// Tokens that produce a value on their own.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::Identifier
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A lexical unit.
///
/// For strings, `text` holds the decoded contents (escapes resolved, quotes
/// stripped). Every kind except [`TokenKind::Eof`] carries non-empty text,
/// with the exception of the empty string literal `""`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Position,
}

impl Token {
    pub(super) fn new(kind: TokenKind, text: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }

    pub fn is_operator(&self, name: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == name
    }

    pub fn is_prefix_operator(&self) -> bool {
        self.kind == TokenKind::Operator && PREFIX_OPERATORS.contains(&self.text.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::String => write!(f, "string {:?}", self.text),
            _ => write!(f, "'{}'", self.text),
        }
    }
}
