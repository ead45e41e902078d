//! Built-in binary and prefix operators.
//!
//! Precedences (higher binds tighter):
//!
//! | operators                 | precedence |
//! |---------------------------|------------|
//! | `*` `/` `%`               | 20         |
//! | `+` `-`                   | 10         |
//! | `<` `<=` `>` `>=`         | 8          |
//! | `==` `!=`                 | 7          |
//! | `&&`                      | 5          |
//! | `\|\|`                    | 4          |
//! | prefix `!`                | 3          |

use crate::evaluator::EvalError;
use crate::registry::{Registry, RegistryError};
use crate::values::Value;
use core::cmp::Ordering;

pub(super) fn register(registry: &Registry) -> Result<(), RegistryError> {
    registry.register_operator("||", 4, |l, r| logical(l, r, |a, b| a || b))?;
    registry.register_operator("&&", 5, |l, r| logical(l, r, |a, b| a && b))?;

    registry.register_operator("==", 7, |l, r| Ok(Value::Bool(l == r)))?;
    registry.register_operator("!=", 7, |l, r| Ok(Value::Bool(l != r)))?;

    registry.register_operator("<", 8, |l, r| compare(l, r, Ordering::is_lt))?;
    registry.register_operator("<=", 8, |l, r| compare(l, r, Ordering::is_le))?;
    registry.register_operator(">", 8, |l, r| compare(l, r, Ordering::is_gt))?;
    registry.register_operator(">=", 8, |l, r| compare(l, r, Ordering::is_ge))?;

    registry.register_operator("+", 10, add)?;
    registry.register_operator("-", 10, |l, r| arithmetic(l, r, |a, b| a - b))?;
    registry.register_operator("*", 20, |l, r| arithmetic(l, r, |a, b| a * b))?;
    registry.register_operator("/", 20, |l, r| {
        let (a, b) = numbers(l, r)?;
        if b == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        Ok(Value::Number(a / b))
    })?;
    registry.register_operator("%", 20, |l, r| {
        let (a, b) = numbers(l, r)?;
        if b == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        Ok(Value::Number(a % b))
    })?;

    registry.register_prefix_operator("!", 3, not)?;
    // Negation is applied to its operand directly, so the precedence is only
    // informational; it matches the additive operators.
    registry.register_prefix_operator("-", 10, negate)?;
    Ok(())
}

/// `+` adds numbers; if either side is a string both sides are concatenated
/// in their display form.
pub fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::from(format!("{left}{right}"))),
        (Value::Number(_), other) | (other, _) => {
            Err(EvalError::type_mismatch("number or string", other))
        }
    }
}

pub fn not(operand: &Value) -> Result<Value, EvalError> {
    operand
        .as_bool()
        .map(|b| Value::Bool(!b))
        .ok_or_else(|| EvalError::type_mismatch("bool", operand))
}

pub fn negate(operand: &Value) -> Result<Value, EvalError> {
    operand
        .as_number()
        .map(|n| Value::Number(-n))
        .ok_or_else(|| EvalError::type_mismatch("number", operand))
}

fn numbers(left: &Value, right: &Value) -> Result<(f64, f64), EvalError> {
    let a = left
        .as_number()
        .ok_or_else(|| EvalError::type_mismatch("number", left))?;
    let b = right
        .as_number()
        .ok_or_else(|| EvalError::type_mismatch("number", right))?;
    Ok((a, b))
}

fn arithmetic(left: &Value, right: &Value, op: fn(f64, f64) -> f64) -> Result<Value, EvalError> {
    let (a, b) = numbers(left, right)?;
    Ok(Value::Number(op(a, b)))
}

fn logical(left: &Value, right: &Value, op: fn(bool, bool) -> bool) -> Result<Value, EvalError> {
    let a = left
        .as_bool()
        .ok_or_else(|| EvalError::type_mismatch("bool", left))?;
    let b = right
        .as_bool()
        .ok_or_else(|| EvalError::type_mismatch("bool", right))?;
    Ok(Value::Bool(op(a, b)))
}

/// Ordering comparison over numbers, strings or times.
///
/// Comparisons involving NaN are false.
fn compare(left: &Value, right: &Value, test: fn(Ordering) -> bool) -> Result<Value, EvalError> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
        (Value::Number(_) | Value::Str(_) | Value::Time(_), other) => {
            return Err(EvalError::type_mismatch(left.type_name(), other));
        }
        (other, _) => return Err(EvalError::type_mismatch("number, string or time", other)),
    };
    Ok(Value::Bool(ordering.is_some_and(test)))
}
