#![allow(dead_code)]

use brisk::{Config, Engine, Value, Variables};
use once_cell::sync::Lazy;

/// Engine with default settings, shared by every case that does not ask for
/// its own configuration.
pub static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(|| Engine::new(Config::default()));

pub fn engine_for(config: Option<Config>) -> EngineRef {
    match config {
        Some(config) => EngineRef::Owned(Engine::new(config)),
        None => EngineRef::Shared(&DEFAULT_ENGINE),
    }
}

pub enum EngineRef {
    Shared(&'static Engine),
    Owned(Engine),
}

impl core::ops::Deref for EngineRef {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        match self {
            EngineRef::Shared(engine) => engine,
            EngineRef::Owned(engine) => engine,
        }
    }
}

pub fn vars<const N: usize>(bindings: [(&str, Value); N]) -> Variables {
    bindings
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Declares an async test that evaluates `input` and checks the outcome.
///
/// ```ignore
/// test_case! {
///     name: precedence,
///     input: "1 + 2 * 3",
///     vars: { "x" => 1 },
///     result: { Ok(Value::from(7)) },
/// }
/// ```
///
/// Every section after `input` is optional:
/// - `config`: engine configuration (a fresh engine is built for the case)
/// - `vars`: variable bindings, each value goes through `Value::from`
/// - `result`: the exact `Result<Value, EngineError>` expected
/// - `stage`: the failing [`Stage`](brisk::Stage)
/// - `message`: the error's `Display` text
#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        $(config: { $config:expr },)?
        $(vars: { $($var:literal => $value:expr),* $(,)? },)?
        $(result: { $result:expr },)?
        $(stage: $stage:expr,)?
        $(message: { $message:expr },)?
    ) => {
        #[tokio::test]
        async fn $name() {
            #[allow(unused_imports)]
            use brisk::*;
            #[allow(unused_imports)]
            use pretty_assertions::assert_eq;

            #[allow(unused_mut, unused_assignments)]
            let mut config: Option<Config> = None;
            $(config = Some($config);)?
            let engine = $crate::cases::engine_for(config);

            #[allow(unused_mut)]
            let mut vars = Variables::new();
            $($(vars.insert($var.to_string(), Value::from($value));)*)?

            let ctx = CancellationToken::new();
            let result = engine.evaluate(&ctx, $input, &vars).await;

            $(assert_eq!(result, $result, "input: {:?}", $input);)?
            $(
                let err = result.as_ref().expect_err("expected an error");
                assert_eq!(err.stage(), $stage, "input: {:?}, error: {}", $input, err);
            )?
            $(
                let err = result.as_ref().expect_err("expected an error");
                assert_eq!(err.to_string(), $message, "input: {:?}", $input);
            )?
        }
    };
}
