//! Tree-walking evaluation of parsed expressions.
//!
//! Evaluation is strictly left to right: the left operand of a binary
//! operator before the right, call arguments in order, and every argument
//! before the call. Cancellation is polled before each node.

mod error;
mod eval;


pub use error::EvalError;
