//! Logical functions
//!
//! - `if(cond, then, else)`: `cond` must be a bool; the branches may be of any
//!   type. Both branches are evaluated before the call, like any argument.
//! - `coalesce(a, ...)`: first argument that is not null, or null.

use crate::evaluator::EvalError;
use crate::registry::{Arity, NativeFunction, Registry, RegistryError};
use crate::validator::ValidationError;
use crate::values::Value;
use std::sync::Arc;

pub(super) fn register(registry: &Registry) -> Result<(), RegistryError> {
    registry.register_function(
        "if",
        NativeFunction::new(Arity::Exact(3), |args| {
            let cond = args[0]
                .as_bool()
                .ok_or_else(|| EvalError::type_mismatch("bool", &args[0]))?;
            Ok(if cond { args[1].clone() } else { args[2].clone() })
        }),
        Some(Arc::new(|args: &[Value]| match args.first() {
            Some(cond) if cond.as_bool().is_none() => Err(ValidationError::arguments(format!(
                "condition must be a bool, got {}",
                cond.type_name()
            ))),
            _ => Ok(()),
        })),
    )?;
    registry.register_function(
        "coalesce",
        NativeFunction::new(Arity::AtLeast(1), |args| {
            Ok(args
                .iter()
                .find(|v| !v.is_null())
                .cloned()
                .unwrap_or(Value::Null))
        }),
        None,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let registry = Registry::new();
        register(&registry).unwrap();
        registry.function(name).unwrap().call(args)
    }

    #[test]
    fn test_if_selects_branch() {
        let args = |cond| [Value::Bool(cond), Value::from("yes"), Value::from(0)];
        assert_eq!(call("if", &args(true)), Ok(Value::from("yes")));
        assert_eq!(call("if", &args(false)), Ok(Value::from(0)));
    }

    #[test]
    fn test_if_requires_bool_condition() {
        let err = call("if", &[Value::from(1), Value::Null, Value::Null]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid arguments to 'if': condition must be a bool, got number"
        );
        assert!(matches!(
            call("if", &[Value::Bool(true), Value::Null]),
            Err(EvalError::ArityMismatch { got: 2, .. })
        ));
    }

    #[test]
    fn test_coalesce() {
        assert_eq!(
            call("coalesce", &[Value::Null, Value::from(2), Value::from(3)]),
            Ok(Value::from(2))
        );
        assert_eq!(call("coalesce", &[Value::Null, Value::Null]), Ok(Value::Null));
        assert_eq!(call("coalesce", &[Value::from("")]), Ok(Value::from("")));
        assert!(matches!(
            call("coalesce", &[]),
            Err(EvalError::ArityMismatch { got: 0, .. })
        ));
    }
}
