//! Runtime evaluation errors.
//!
//! These are errors that can occur while walking the AST: unknown names,
//! arity and type problems detected at call time, and failures reported by
//! operator or function handlers.

use crate::registry::Arity;
use crate::validator::ValidationError;
use thiserror::Error;

/// Runtime evaluation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// An identifier had no binding in the supplied variables.
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    /// A call named a function that is not registered.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// An operator node named an operator that is not registered.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// Number of evaluated arguments does not fit the function's arity.
    #[error("function '{function}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        function: String,
        expected: Arity,
        got: usize,
    },

    /// A function's argument validator rejected the evaluated arguments.
    #[error("invalid arguments to '{function}': {source}")]
    InvalidArguments {
        function: String,
        #[source]
        source: ValidationError,
    },

    /// An operator handler failed.
    #[error("operator '{op}': {source}")]
    Operator {
        op: String,
        #[source]
        source: Box<EvalError>,
    },

    /// A value had the wrong dynamic type for the operation.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A handler reported a failure of its own.
    #[error("{0}")]
    Handler(String),

    /// Evaluation was abandoned because its context was cancelled.
    #[error("evaluation cancelled")]
    Cancelled,
}

impl EvalError {
    /// Convenience constructor for host-function failures.
    pub fn handler(message: impl Into<String>) -> Self {
        EvalError::Handler(message.into())
    }

    pub(crate) fn type_mismatch(expected: &'static str, found: &crate::Value) -> Self {
        EvalError::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }
}
