//! Math functions
//!
//! Functions: abs, round, ceil, floor. Each takes one number.

use super::each_arg;
use crate::evaluator::EvalError;
use crate::registry::{Arity, NativeFunction, Registry, RegistryError};
use crate::values::Value;

pub(super) fn register(registry: &Registry) -> Result<(), RegistryError> {
    let numeric = each_arg("number", |v| v.as_number().is_some());

    for (name, op) in [
        ("abs", f64::abs as fn(f64) -> f64),
        ("round", f64::round),
        ("ceil", f64::ceil),
        ("floor", f64::floor),
    ] {
        registry.register_function(
            name,
            NativeFunction::new(Arity::Exact(1), move |args| unary(args, op)),
            Some(numeric.clone()),
        )?;
    }
    Ok(())
}

fn unary(args: &[Value], op: fn(f64) -> f64) -> Result<Value, EvalError> {
    let value = args[0]
        .as_number()
        .ok_or_else(|| EvalError::type_mismatch("number", &args[0]))?;
    Ok(Value::Number(op(value)))
}
