//! Brisk - a small, embeddable expression engine
//!
//! # Overview
//!
//! Brisk evaluates short, user-supplied expressions against variables provided
//! by the host application. Common use cases include:
//!
//! - Pricing and scoring formulas
//! - Feature flags and conditional logic
//! - Validation rules over form or event data
//!
//! Expressions support arithmetic, comparison, logical operators and function
//! calls. There are no loops, assignments or user-defined functions.
//!
//! # Quick Start
//!
//! ```ignore
//! use brisk::{CancellationToken, Config, Engine, Value, Variables};
//!
//! let engine = Engine::new(Config::default());
//!
//! let mut vars = Variables::new();
//! vars.insert("price".to_string(), Value::from(120));
//! vars.insert("qty".to_string(), Value::from(3));
//!
//! let ctx = CancellationToken::new();
//! let total = engine.evaluate(&ctx, "price * qty * 0.9", &vars).await?;
//! assert_eq!(total, Value::from(324));
//! ```
//!
//! # Host functions
//!
//! ```ignore
//! use brisk::{Arity, EvalError, NativeFunction, Value};
//!
//! let clamp = NativeFunction::new(Arity::Exact(3), |args| {
//!     let [x, lo, hi] = [&args[0], &args[1], &args[2]].map(|v| v.as_number());
//!     match (x, lo, hi) {
//!         (Some(x), Some(lo), Some(hi)) => Ok(Value::from(x.clamp(lo, hi))),
//!         _ => Err(EvalError::handler("clamp expects numbers")),
//!     }
//! });
//! engine.register_function("clamp", clamp, None)?;
//! ```

// Re-export public API from brisk_core
pub use brisk_core::api::{CancelReason, Config, Engine, EngineError, ParallelError, Stage};
pub use brisk_core::CancellationToken;

pub use brisk_core::cache::{CacheError, CacheStats};
pub use brisk_core::registry::{Arity, NativeFunction, RegistryError, Validator};
pub use brisk_core::values::{self, Value, Variables};

// Re-export errors
pub use brisk_core::evaluator::EvalError;
pub use brisk_core::lexer::{LexError, Position};
pub use brisk_core::parser::ParseError;
pub use brisk_core::validator::ValidationError;

pub mod error_renderer;

pub use error_renderer::{
    Locate, render_error, render_error_to, render_error_to_string,
    render_error_to_string_no_color,
};
