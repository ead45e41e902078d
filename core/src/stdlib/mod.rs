//! Brisk standard library
//!
//! Built-in operators and functions registered on every engine:
//! - Operators: arithmetic, comparison, logical, prefix `!` and `-`
//! - Math: `abs`, `round`, `ceil`, `floor`
//! - String: `len`, `lower`, `upper`, `trim`
//! - Array: `count`, `sum`
//! - Date: `now`, `date`
//! - Logical: `if`, `coalesce`
//!
//! Every function is a [`NativeFunction`] with a declared arity; most also carry
//! a validator so type errors are reported before the handler runs.

use crate::registry::{Registry, RegistryError, Validator};
use crate::validator::ValidationError;
use crate::values::Value;
use std::sync::Arc;

pub mod array;
pub mod date;
pub mod logical;
pub mod math;
pub mod operators;
pub mod string;


/// Register all built-in operators and functions.
///
/// Fails only if one of the names is already taken, which cannot happen on a
/// fresh [`Registry`].
///
/// # Example
///
/// ```ignore
/// let registry = Registry::new();
/// register_builtins(&registry)?;
/// assert!(registry.function("abs").is_some());
/// ```
pub fn register_builtins(registry: &Registry) -> Result<(), RegistryError> {
    operators::register(registry)?;
    math::register(registry)?;
    string::register(registry)?;
    array::register(registry)?;
    date::register(registry)?;
    logical::register(registry)?;
    Ok(())
}

/// Validator requiring every argument to satisfy `check`.
///
/// Argument count is not checked here; the function's arity covers that.
pub(crate) fn each_arg(expected: &'static str, check: fn(&Value) -> bool) -> Validator {
    Arc::new(move |args: &[Value]| {
        match args.iter().enumerate().find(|(_, arg)| !check(arg)) {
            Some((index, arg)) => Err(ValidationError::arguments(format!(
                "argument {} must be a {}, got {}",
                index + 1,
                expected,
                arg.type_name()
            ))),
            None => Ok(()),
        }
    })
}
