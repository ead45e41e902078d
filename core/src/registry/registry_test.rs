use super::*;
use crate::validator::ValidationError;
use pretty_assertions::assert_eq;

fn constant(value: f64) -> NativeFunction {
    NativeFunction::new(Arity::Exact(0), move |_| Ok(Value::from(value)))
}

#[test]
fn test_register_and_call_function() {
    let registry = Registry::new();
    registry
        .register_function("answer", constant(42.0), None)
        .unwrap();

    let function = registry.function("answer").unwrap();
    assert_eq!(function.name(), "answer");
    assert_eq!(function.arity(), Arity::Exact(0));
    assert_eq!(function.call(&[]), Ok(Value::from(42)));
    assert!(registry.function("question").is_none());
}

#[test]
fn test_first_registration_wins() {
    let registry = Registry::new();
    registry.register_function("f", constant(1.0), None).unwrap();

    let err = registry
        .register_function("f", constant(2.0), None)
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Duplicate {
            kind: "function",
            name: "f".to_string()
        }
    );
    assert_eq!(err.to_string(), "function 'f' is already registered");
    assert_eq!(registry.function("f").unwrap().call(&[]), Ok(Value::from(1)));
}

#[test]
fn test_function_names_must_be_identifiers() {
    let registry = Registry::new();
    for name in ["", "1abc", "a-b", "with space", "é"] {
        assert!(
            matches!(
                registry.register_function(name, constant(0.0), None),
                Err(RegistryError::InvalidName { .. })
            ),
            "{name:?} should be rejected"
        );
    }
    assert!(registry.register_function("_ok_1", constant(0.0), None).is_ok());
}

#[test]
fn test_validator_runs_before_arity_check() {
    let registry = Registry::new();
    let positive: Validator = Arc::new(|args: &[Value]| {
        if args.iter().all(|a| a.as_number().is_some_and(|n| n > 0.0)) {
            Ok(())
        } else {
            Err(ValidationError::arguments("arguments must be positive"))
        }
    });
    registry
        .register_function(
            "pair",
            NativeFunction::new(Arity::Exact(2), |args| {
                Ok(Value::from(args.len() as f64))
            }),
            Some(positive),
        )
        .unwrap();
    let pair = registry.function("pair").unwrap();

    assert_eq!(pair.call(&[Value::from(1), Value::from(2)]), Ok(Value::from(2)));
    assert!(matches!(
        pair.call(&[Value::from(-1)]),
        Err(EvalError::InvalidArguments { .. })
    ));
    assert!(matches!(
        pair.call(&[Value::from(1)]),
        Err(EvalError::ArityMismatch { got: 1, .. })
    ));
}

#[test]
fn test_variadic_arity() {
    assert!(Arity::AtLeast(1).accepts(1));
    assert!(Arity::AtLeast(1).accepts(5));
    assert!(!Arity::AtLeast(1).accepts(0));
    assert!(Arity::Exact(2).accepts(2));
    assert!(!Arity::Exact(2).accepts(3));
    assert_eq!(Arity::AtLeast(2).to_string(), "at least 2");
    assert_eq!(Arity::Exact(3).to_string(), "3");
}

#[test]
fn test_register_operator() {
    let registry = Registry::new();
    registry
        .register_operator("&", 6, |l, r| {
            Ok(Value::Bool(l.as_bool() == Some(true) && r.as_bool() == Some(true)))
        })
        .unwrap();

    let op = registry.operator("&").unwrap();
    assert_eq!(op.precedence(), 6);
    assert_eq!(
        op.apply(&Value::Bool(true), &Value::Bool(true)),
        Ok(Value::Bool(true))
    );
    assert!(matches!(
        registry.register_operator("&", 1, |_, _| Ok(Value::Null)),
        Err(RegistryError::Duplicate { kind: "operator", .. })
    ));
}

#[test]
fn test_operator_names_must_be_lexable() {
    let registry = Registry::new();
    for name in ["", "plus", "**", "<>", "(", "+++"] {
        assert!(
            matches!(
                registry.register_operator(name, 1, |_, _| Ok(Value::Null)),
                Err(RegistryError::InvalidName { kind: "operator", .. })
            ),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn test_operator_errors_are_wrapped() {
    let registry = Registry::new();
    registry
        .register_operator("%", 20, |_, _| Err(EvalError::handler("nope")))
        .unwrap();
    let err = registry
        .operator("%")
        .unwrap()
        .apply(&Value::Null, &Value::Null)
        .unwrap_err();
    assert_eq!(err.to_string(), "operator '%': nope");
}

#[test]
fn test_prefix_operators_are_restricted() {
    let registry = Registry::new();
    registry
        .register_prefix_operator("!", 3, |v| Ok(Value::Bool(v.is_null())))
        .unwrap();
    assert!(matches!(
        registry.register_prefix_operator("+", 3, |v| Ok(v.clone())),
        Err(RegistryError::InvalidName { kind: "prefix operator", .. })
    ));
    assert_eq!(
        registry.prefix_operator("!").unwrap().apply(&Value::Null),
        Ok(Value::Bool(true))
    );
}

#[test]
fn test_listing_names() {
    let registry = Registry::new();
    registry.register_function("zeta", constant(0.0), None).unwrap();
    registry.register_function("alpha", constant(0.0), None).unwrap();
    registry.register_operator("+", 10, |_, _| Ok(Value::Null)).unwrap();
    registry.register_operator("*", 20, |_, _| Ok(Value::Null)).unwrap();
    registry.register_operator("-", 10, |_, _| Ok(Value::Null)).unwrap();

    assert_eq!(registry.function_names(), vec!["alpha", "zeta"]);
    assert_eq!(
        registry.operator_names(),
        vec![
            ("+".to_string(), 10),
            ("-".to_string(), 10),
            ("*".to_string(), 20)
        ]
    );
}

#[test]
fn test_concurrent_registration_and_lookup() {
    let registry = Registry::new();
    std::thread::scope(|scope| {
        for i in 0..8 {
            let registry = &registry;
            scope.spawn(move || {
                registry
                    .register_function(&format!("f{i}"), constant(i as f64), None)
                    .unwrap();
                // Exactly one of the racing registrations succeeds.
                let _ = registry.register_function("shared", constant(i as f64), None);
                registry.function_names()
            });
        }
    });
    assert_eq!(registry.function_names().len(), 9);
    for i in 0..8 {
        assert_eq!(
            registry.function(&format!("f{i}")).unwrap().call(&[]),
            Ok(Value::from(i))
        );
    }
}
