//! Token stream to expression tree.
//!
//! Binary expressions use precedence climbing driven by the operator
//! precedences stored in the [`Registry`](crate::registry::Registry); prefix
//! operators bind to the operand that immediately follows them.

mod ast;
mod error;
mod parser;


pub use ast::Node;
pub use error::ParseError;
pub use parser::parse;
