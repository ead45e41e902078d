//! Runtime values flowing between AST nodes, functions and the caller.

mod value;


pub use value::{Value, Variables};
