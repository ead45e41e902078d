use super::Position;
use thiserror::Error;

/// Errors raised while turning source text into tokens.
///
/// Every variant carries the position where the problem starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: Position },

    #[error("unterminated string starting at {pos}")]
    UnterminatedString { pos: Position },

    #[error("invalid escape sequence '\\{seq}' at {pos}")]
    InvalidEscape { seq: char, pos: Position },

    #[error("unknown operator '{text}' at {pos}")]
    UnknownOperator { text: String, pos: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { pos, .. }
            | LexError::UnterminatedString { pos }
            | LexError::InvalidEscape { pos, .. }
            | LexError::UnknownOperator { pos, .. } => *pos,
        }
    }
}
