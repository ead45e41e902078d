//! Hand-written scanner producing [`Token`]s with line/column positions.

use super::{
    LexError, PREFIX_OPERATORS, Position, SINGLE_CHAR_OPERATORS, TWO_CHAR_OPERATORS, Token,
    TokenKind, is_operator_char,
};
use crate::syntax::string_literal::unescape_char;
use core::iter::Peekable;
use core::str::CharIndices;

/// Tokenize an expression.
///
/// The returned stream always ends with a single [`TokenKind::Eof`] token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let done = lexer.next_tokens(&mut tokens)?;
        if done {
            break;
        }
    }
    tracing::trace!(count = tokens.len(), "tokenized expression");
    Ok(tokens)
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn position(&mut self) -> Position {
        let offset = self
            .chars
            .peek()
            .map_or(self.source.len(), |(offset, _)| *offset);
        Position {
            line: self.line,
            col: self.col,
            offset,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    /// Scan the next token(s) into `out`. Returns `true` once EOF was pushed.
    fn next_tokens(&mut self, out: &mut Vec<Token>) -> Result<bool, LexError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }

        let pos = self.position();
        let Some(c) = self.peek() else {
            out.push(Token::new(TokenKind::Eof, "", pos));
            return Ok(true);
        };

        match c {
            '0'..='9' => out.push(self.number(pos)),
            c if c.is_ascii_alphabetic() || c == '_' => out.push(self.identifier(pos)),
            '"' | '\'' => out.push(self.string(pos)?),
            '(' => out.push(self.single(TokenKind::LParen, pos)),
            ')' => out.push(self.single(TokenKind::RParen, pos)),
            '.' => out.push(self.single(TokenKind::Dot, pos)),
            ',' => out.push(self.single(TokenKind::Comma, pos)),
            c if is_operator_char(c) => self.operators(pos, out)?,
            ch => return Err(LexError::UnexpectedChar { ch, pos }),
        }
        Ok(false)
    }

    fn single(&mut self, kind: TokenKind, pos: Position) -> Token {
        let c = self.bump().unwrap_or_default();
        Token::new(kind, c, pos)
    }

    fn number(&mut self, pos: Position) -> Token {
        let mut text = String::new();
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => text.push(c),
                // A second dot ends the number; the parser sees a Dot token next.
                '.' if !seen_dot => {
                    seen_dot = true;
                    text.push(c);
                }
                _ => break,
            }
            self.bump();
        }
        Token::new(TokenKind::Number, text, pos)
    }

    fn identifier(&mut self, pos: Position) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            text.push(c);
            self.bump();
        }
        Token::new(TokenKind::Identifier, text, pos)
    }

    fn string(&mut self, pos: Position) -> Result<Token, LexError> {
        let quote = self.bump().unwrap_or('"');
        let mut text = String::new();
        loop {
            let escape_pos = self.position();
            match self.bump() {
                None => return Err(LexError::UnterminatedString { pos }),
                Some(c) if c == quote => break,
                Some('\\') => {
                    let Some(seq) = self.bump() else {
                        return Err(LexError::UnterminatedString { pos });
                    };
                    let decoded = unescape_char(seq)
                        .ok_or(LexError::InvalidEscape { seq, pos: escape_pos })?;
                    text.push(decoded);
                }
                Some(c) => text.push(c),
            }
        }
        Ok(Token::new(TokenKind::String, text, pos))
    }

    /// Scan a maximal run of operator characters.
    ///
    /// A run is accepted when it is a known operator, or a known operator
    /// followed by one prefix operator (`*-`, `==!`, `!!`).
    fn operators(&mut self, pos: Position, out: &mut Vec<Token>) -> Result<(), LexError> {
        let mut run = String::new();
        while let Some(c) = self.peek().filter(|c| is_operator_char(*c)) {
            run.push(c);
            self.bump();
        }

        if is_known_operator(&run) {
            out.push(Token::new(TokenKind::Operator, run, pos));
            return Ok(());
        }

        if let Some((head, tail)) = split_prefix_tail(&run) {
            let tail_pos = Position {
                line: pos.line,
                col: pos.col + head.len(),
                offset: pos.offset + head.len(),
            };
            out.push(Token::new(TokenKind::Operator, head, pos));
            out.push(Token::new(TokenKind::Operator, tail, tail_pos));
            return Ok(());
        }

        Err(LexError::UnknownOperator { text: run, pos })
    }
}

fn is_known_operator(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => SINGLE_CHAR_OPERATORS.contains(&c),
        (Some(_), Some(_)) => TWO_CHAR_OPERATORS.contains(&text),
        _ => false,
    }
}

fn split_prefix_tail(run: &str) -> Option<(&str, &str)> {
    // Operator characters are ASCII, so byte indexing is char indexing.
    if run.len() < 2 {
        return None;
    }
    let (head, tail) = run.split_at(run.len() - 1);
    (PREFIX_OPERATORS.contains(&tail) && is_known_operator(head)).then_some((head, tail))
}
