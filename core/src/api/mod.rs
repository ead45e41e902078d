//! Public API of the Brisk engine.
//!
//! # Example
//!
//! ```ignore
//! use brisk_core::api::{Config, Engine};
//! use brisk_core::values::{Value, Variables};
//! use tokio_util::sync::CancellationToken;
//!
//! let engine = Engine::new(Config::default());
//!
//! let mut vars = Variables::new();
//! vars.insert("x".to_string(), Value::from(10));
//! vars.insert("y".to_string(), Value::from(20));
//!
//! let ctx = CancellationToken::new();
//! let value = engine.evaluate(&ctx, "x + y", &vars).await?;
//! assert_eq!(value, Value::from(30));
//! ```

pub mod engine;
pub mod error;
pub mod options;


pub use engine::Engine;
pub use error::{CancelReason, EngineError, ParallelError, Stage};
pub use options::Config;
