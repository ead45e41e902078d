//! Literal syntax helpers shared by the lexer and value rendering.

pub mod string_literal;
