//! Array functions
//!
//! Functions: count, sum. Each takes one array.

use super::each_arg;
use crate::evaluator::EvalError;
use crate::registry::{Arity, NativeFunction, Registry, RegistryError};
use crate::values::Value;

pub(super) fn register(registry: &Registry) -> Result<(), RegistryError> {
    let array = each_arg("array", |v| v.as_array().is_some());

    registry.register_function(
        "count",
        NativeFunction::new(Arity::Exact(1), |args| {
            Ok(Value::from(array_arg(args)?.len() as f64))
        }),
        Some(array.clone()),
    )?;
    registry.register_function(
        "sum",
        NativeFunction::new(Arity::Exact(1), |args| {
            let total = array_arg(args)?.iter().filter_map(coerce_number).sum::<f64>();
            Ok(Value::Number(total))
        }),
        Some(array),
    )?;
    Ok(())
}

fn array_arg(args: &[Value]) -> Result<&[Value], EvalError> {
    args[0]
        .as_array()
        .ok_or_else(|| EvalError::type_mismatch("array", &args[0]))
}

/// Numeric view of an array element: numbers as-is, strings that parse as a
/// number, anything else skipped.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}
