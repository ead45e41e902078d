//! Structural checks that run before, or instead of, evaluation.
//!
//! Two layers exist. [`validate_expression`] works on the raw text and is
//! always applied by the engine: it enforces the input limits and rejects
//! obviously malformed operator runs without tokenizing. [`check_token_sequence`]
//! is the strict-mode scan over a token stream; it rejects adjacency patterns the
//! parser would otherwise accept (for example `1 + -2` or `!!a`).

use crate::api::Config;
use crate::lexer::{LexError, Position, Token, TokenKind, is_operator_char, tokenize};
use crate::parser::{ParseError, parse};
use crate::registry::Registry;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("expression is empty")]
    Empty,

    #[error("expression is {len} bytes long, maximum is {max}")]
    TooLong { len: usize, max: usize },

    #[error("parenthesis nesting depth {depth} exceeds maximum of {max}")]
    DepthExceeded { depth: usize, max: usize },

    #[error("unbalanced ')' at {pos}")]
    UnbalancedParens { pos: Position },

    #[error("consecutive operators '{first}' and '{second}' at {pos}")]
    ConsecutiveOperators {
        first: String,
        second: String,
        pos: Position,
    },

    #[error("unexpected {found} after {after} at {pos}")]
    UnexpectedSequence {
        after: String,
        found: String,
        pos: Position,
    },

    #[error("expression cannot end with {found}")]
    InvalidEnd { found: String },

    #[error("array variable '{name}' has {len} elements, maximum is {max}")]
    ArrayTooLong { name: String, len: usize, max: usize },

    #[error("tokenize error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Rejection reported by a function's argument validator.
    #[error("{0}")]
    Arguments(String),
}

impl ValidationError {
    pub fn arguments(message: impl Into<String>) -> Self {
        ValidationError::Arguments(message.into())
    }
}

/// Check the input limits and raw operator layout of an expression.
///
/// Order: emptiness, length, parenthesis depth, operator adjacency. An
/// unclosed `(` is not reported here; the parser reports it with the position
/// of the opening parenthesis.
pub fn validate_expression(
    expr: &str,
    max_length: usize,
    max_depth: usize,
) -> Result<(), ValidationError> {
    if expr.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if expr.len() > max_length {
        return Err(ValidationError::TooLong {
            len: expr.len(),
            max: max_length,
        });
    }

    let depth = paren_depth(expr)?;
    if depth > max_depth {
        return Err(ValidationError::DepthExceeded {
            depth,
            max: max_depth,
        });
    }

    validate_operators(expr)
}

/// Maximum parenthesis nesting of the raw text, ignoring string literals.
///
/// Fails if a `)` closes more groups than were opened.
pub fn paren_depth(expr: &str) -> Result<usize, ValidationError> {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut scanner = RawScanner::new(expr);

    while let Some((pos, c)) = scanner.next_outside_strings() {
        match c {
            '(' => {
                depth += 1;
                max = max.max(depth);
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ValidationError::UnbalancedParens { pos })?;
            }
            _ => {}
        }
    }
    Ok(max)
}

/// Reject an operator run followed, across whitespace only, by another run
/// that is not made purely of prefix operators.
///
/// `1 + + 2` and `a * / b` fail; `1 + -2` and `a && !b` pass. Runs written
/// without whitespace (`+*`) are left to the lexer.
pub fn validate_operators(expr: &str) -> Result<(), ValidationError> {
    let mut scanner = RawScanner::new(expr);
    let mut previous: Option<String> = None;

    while let Some((pos, c)) = scanner.next_outside_strings() {
        if c.is_whitespace() {
            continue;
        }
        if !is_operator_char(c) {
            previous = None;
            continue;
        }

        let mut run = String::from(c);
        while let Some(next) = scanner.peek().filter(|c| is_operator_char(*c)) {
            run.push(next);
            scanner.bump();
        }

        if let Some(first) = previous.take()
            && !run.chars().all(|c| c == '!' || c == '-')
        {
            return Err(ValidationError::ConsecutiveOperators {
                first,
                second: run,
                pos,
            });
        }
        previous = Some(run);
    }
    Ok(())
}

/// Strict-mode scan over a token stream.
pub fn check_token_sequence(tokens: &[Token]) -> Result<(), ValidationError> {
    let mut previous: Option<&Token> = None;
    // The token before `previous`, needed to tell `f()` from `()`.
    let mut before_previous: Option<&Token> = None;

    for token in tokens.iter().take_while(|t| t.kind != TokenKind::Eof) {
        check_pair(before_previous, previous, token)?;
        before_previous = previous;
        previous = Some(token);
    }

    match previous {
        None => Err(ValidationError::Empty),
        Some(last) if last.kind.is_value() || last.kind == TokenKind::RParen => Ok(()),
        Some(last) => Err(ValidationError::InvalidEnd {
            found: last.to_string(),
        }),
    }
}

fn check_pair(
    before_previous: Option<&Token>,
    previous: Option<&Token>,
    token: &Token,
) -> Result<(), ValidationError> {
    use TokenKind::*;

    let unexpected = |after: &str| ValidationError::UnexpectedSequence {
        after: after.to_string(),
        found: token.to_string(),
        pos: token.pos,
    };

    let Some(previous) = previous else {
        // Start of input behaves like a freshly opened group.
        return match token.kind {
            Operator if !token.is_prefix_operator() => Err(unexpected("start of input")),
            RParen | Comma | Dot => Err(unexpected("start of input")),
            _ => Ok(()),
        };
    };
    let after = previous.to_string();

    match (previous.kind, token.kind) {
        (Operator, Operator) => Err(ValidationError::ConsecutiveOperators {
            first: previous.text.clone(),
            second: token.text.clone(),
            pos: token.pos,
        }),
        (LParen | Comma, Operator) if !token.is_prefix_operator() => Err(unexpected(&after)),
        (Operator, RParen) => Err(unexpected(&after)),
        (LParen, RParen) => {
            let is_call = before_previous.is_some_and(|t| t.kind == Identifier);
            if is_call {
                Ok(())
            } else {
                Err(unexpected("'(' (empty parentheses)"))
            }
        }
        (prev, cur) if prev.is_value() && cur.is_value() => Err(unexpected(&after)),
        (RParen, cur) if cur.is_value() => Err(unexpected(&after)),
        (RParen, LParen) => Err(unexpected(&after)),
        (Number | String, LParen) => Err(unexpected(&after)),
        (Operator | LParen | Comma, Comma) => Err(unexpected(&after)),
        _ => Ok(()),
    }
}

/// Full standalone check: limits, operator layout, tokenize, parse, and the
/// strict token scan when `config.strict_mode` is set.
pub fn validate_syntax(
    expr: &str,
    registry: &Registry,
    config: &Config,
) -> Result<(), ValidationError> {
    validate_expression(expr, config.max_string_length, config.max_depth)?;
    let tokens = tokenize(expr)?;
    parse(&tokens, registry, config.max_depth)?;
    if config.strict_mode {
        check_token_sequence(&tokens)?;
    }
    Ok(())
}

/// Character walk over raw text that tracks positions and hops over quoted
/// strings.
struct RawScanner<'a> {
    chars: core::iter::Peekable<core::str::CharIndices<'a>>,
    line: usize,
    col: usize,
}

impl<'a> RawScanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<(Position, char)> {
        let (offset, c) = self.chars.next()?;
        let pos = Position {
            line: self.line,
            col: self.col,
            offset,
        };
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some((pos, c))
    }

    /// Next character that is not inside a string literal. An unterminated
    /// literal swallows the rest of the input; the lexer reports it.
    fn next_outside_strings(&mut self) -> Option<(Position, char)> {
        loop {
            let (pos, c) = self.bump()?;
            if c != '"' && c != '\'' {
                return Some((pos, c));
            }
            while let Some((_, inner)) = self.bump() {
                match inner {
                    '\\' => {
                        self.bump();
                    }
                    q if q == c => break,
                    _ => {}
                }
            }
        }
    }
}
