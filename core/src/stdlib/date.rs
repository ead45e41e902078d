//! Date functions
//!
//! - `now()`: current instant, in UTC.
//! - `date(text)`: parse an RFC 3339 timestamp, keeping its offset.

use super::each_arg;
use crate::evaluator::EvalError;
use crate::registry::{Arity, NativeFunction, Registry, RegistryError};
use crate::values::Value;
use chrono::{DateTime, Utc};

pub(super) fn register(registry: &Registry) -> Result<(), RegistryError> {
    registry.register_function(
        "now",
        NativeFunction::new(Arity::Exact(0), |_| {
            Ok(Value::Time(Utc::now().fixed_offset()))
        }),
        None,
    )?;
    registry.register_function(
        "date",
        NativeFunction::new(Arity::Exact(1), |args| {
            let text = args[0]
                .as_str()
                .ok_or_else(|| EvalError::type_mismatch("string", &args[0]))?;
            parse_date(text).map(Value::Time)
        }),
        Some(each_arg("string", |v| v.as_str().is_some())),
    )?;
    Ok(())
}

pub fn parse_date(text: &str) -> Result<DateTime<chrono::FixedOffset>, EvalError> {
    DateTime::parse_from_rfc3339(text)
        .map_err(|e| EvalError::handler(format!("invalid date '{}': {}", text, e)))
}
