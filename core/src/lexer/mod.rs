//! Lexical analysis: raw expression text to a token stream.

mod error;
mod lexer;
mod token;


pub use error::LexError;
pub use lexer::tokenize;
pub use token::{
    PREFIX_OPERATORS, Position, SINGLE_CHAR_OPERATORS, TWO_CHAR_OPERATORS, Token, TokenKind,
    is_operator_char,
};
