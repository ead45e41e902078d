use crate::lexer::Position;
use thiserror::Error;

/// Parser error.
///
/// Parsing stops at the first error; there is no recovery.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {pos}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: Position,
    },

    #[error("missing ')' to close '(' opened at {open}, found {found} at {pos}")]
    MissingClosingParen {
        open: Position,
        found: String,
        pos: Position,
    },

    #[error("invalid number literal '{text}' at {pos}")]
    InvalidNumber { text: String, pos: Position },

    #[error("'{name}' is not a binary operator at {pos}")]
    UnknownOperator { name: String, pos: Position },

    #[error("empty argument in call to '{function}' at {pos}")]
    EmptyArgument { function: String, pos: Position },

    #[error("expression nesting exceeds maximum depth of {max_depth} at {pos}")]
    MaxDepthExceeded { max_depth: usize, pos: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { pos, .. }
            | ParseError::MissingClosingParen { pos, .. }
            | ParseError::InvalidNumber { pos, .. }
            | ParseError::UnknownOperator { pos, .. }
            | ParseError::EmptyArgument { pos, .. }
            | ParseError::MaxDepthExceeded { pos, .. } => *pos,
        }
    }
}
