//! String functions
//!
//! Functions: len, lower, upper, trim. Each takes one string.

use super::each_arg;
use crate::evaluator::EvalError;
use crate::registry::{Arity, NativeFunction, Registry, RegistryError};
use crate::values::Value;

pub(super) fn register(registry: &Registry) -> Result<(), RegistryError> {
    let textual = each_arg("string", |v| v.as_str().is_some());

    registry.register_function(
        "len",
        NativeFunction::new(Arity::Exact(1), |args| {
            let s = string_arg(args)?;
            Ok(Value::from(s.chars().count() as f64))
        }),
        Some(textual.clone()),
    )?;
    registry.register_function(
        "lower",
        NativeFunction::new(Arity::Exact(1), |args| {
            Ok(Value::from(string_arg(args)?.to_lowercase()))
        }),
        Some(textual.clone()),
    )?;
    registry.register_function(
        "upper",
        NativeFunction::new(Arity::Exact(1), |args| {
            Ok(Value::from(string_arg(args)?.to_uppercase()))
        }),
        Some(textual.clone()),
    )?;
    registry.register_function(
        "trim",
        NativeFunction::new(Arity::Exact(1), |args| Ok(Value::str(string_arg(args)?.trim()))),
        Some(textual),
    )?;
    Ok(())
}

fn string_arg(args: &[Value]) -> Result<&str, EvalError> {
    args[0]
        .as_str()
        .ok_or_else(|| EvalError::type_mismatch("string", &args[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(name: &str, arg: impl Into<Value>) -> Result<Value, EvalError> {
        let registry = Registry::new();
        register(&registry).unwrap();
        registry.function(name).unwrap().call(&[arg.into()])
    }

    #[test]
    fn test_len_counts_characters() {
        assert_eq!(call("len", "hello"), Ok(Value::from(5)));
        assert_eq!(call("len", ""), Ok(Value::from(0)));
        assert_eq!(call("len", "héllo"), Ok(Value::from(5)));
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(call("lower", "HeLLo"), Ok(Value::from("hello")));
        assert_eq!(call("upper", "HeLLo"), Ok(Value::from("HELLO")));
    }

    #[test]
    fn test_trim() {
        assert_eq!(call("trim", "  padded\t\n"), Ok(Value::from("padded")));
    }

    #[test]
    fn test_rejects_non_strings() {
        let err = call("upper", 42).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid arguments to 'upper': argument 1 must be a string, got number"
        );
    }
}
