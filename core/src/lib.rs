//! Core of the Brisk expression engine.
//!
//! Brisk compiles small textual expressions (arithmetic, comparison, logical and
//! function-call syntax) and evaluates them against a caller-supplied variable
//! binding, under resource limits and cooperative cancellation.
//!
//! The pipeline is:
//!
//! ```text
//! source ─▶ lexer ─▶ parser ─▶ AST ─▶ evaluator ─▶ Value
//!             ▲          ▲                ▲
//!             └──── registry (operators, functions) ────┘
//! ```
//!
//! [`api::Engine`] wires the stages together, adds input limits, a result cache,
//! timeouts and panic recovery.

pub mod api;
pub mod cache;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod stdlib;
pub mod syntax;
pub mod validator;
pub mod values;

pub use api::{Config, Engine, EngineError, Stage};
pub use tokio_util::sync::CancellationToken;
pub use values::{Value, Variables};
