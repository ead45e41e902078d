//! Native function and operator representations.

use crate::evaluator::EvalError;
use crate::validator::ValidationError;
use crate::values::Value;
use core::fmt;
use std::sync::Arc;

/// Signature of a host function body.
pub type Handler = Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// Optional pre-invocation check over the evaluated arguments.
pub type Validator = Arc<dyn Fn(&[Value]) -> Result<(), ValidationError> + Send + Sync>;

/// Signature of a binary operator.
pub type BinaryHandler = Arc<dyn Fn(&Value, &Value) -> Result<Value, EvalError> + Send + Sync>;

/// Signature of a prefix operator.
pub type PrefixHandler = Arc<dyn Fn(&Value) -> Result<Value, EvalError> + Send + Sync>;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// A host function with its declared arity.
///
/// # Example
///
/// ```ignore
/// let double = NativeFunction::new(Arity::Exact(1), |args| {
///     let n = args[0].as_number().ok_or_else(|| EvalError::handler("not a number"))?;
///     Ok(Value::from(n * 2.0))
/// });
/// engine.register_function("double", double, None)?;
/// ```
#[derive(Clone)]
pub struct NativeFunction {
    arity: Arity,
    handler: Handler,
}

impl NativeFunction {
    pub fn new(
        arity: Arity,
        handler: impl Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            arity,
            handler: Arc::new(handler),
        }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A registered function entry.
pub struct Function {
    name: String,
    native: NativeFunction,
    validator: Option<Validator>,
}

impl Function {
    pub(crate) fn new(name: String, native: NativeFunction, validator: Option<Validator>) -> Self {
        Self {
            name,
            native,
            validator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.native.arity
    }

    /// Validate and invoke the function over already-evaluated arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        if let Some(validator) = &self.validator {
            validator(args).map_err(|source| EvalError::InvalidArguments {
                function: self.name.clone(),
                source,
            })?;
        }

        if !self.native.arity.accepts(args.len()) {
            return Err(EvalError::ArityMismatch {
                function: self.name.clone(),
                expected: self.native.arity,
                got: args.len(),
            });
        }

        (self.native.handler)(args)
    }
}

/// A registered binary operator.
pub struct Operator {
    name: String,
    precedence: u32,
    apply: BinaryHandler,
}

impl Operator {
    pub(crate) fn new(name: String, precedence: u32, apply: BinaryHandler) -> Self {
        Self {
            name,
            precedence,
            apply,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(&self) -> u32 {
        self.precedence
    }

    /// Apply the operator, wrapping any failure with the operator name.
    pub fn apply(&self, left: &Value, right: &Value) -> Result<Value, EvalError> {
        (self.apply)(left, right).map_err(|e| EvalError::Operator {
            op: self.name.clone(),
            source: Box::new(e),
        })
    }
}

/// A registered prefix operator.
pub struct PrefixOperator {
    name: String,
    precedence: u32,
    apply: PrefixHandler,
}

impl PrefixOperator {
    pub(crate) fn new(name: String, precedence: u32, apply: PrefixHandler) -> Self {
        Self {
            name,
            precedence,
            apply,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn precedence(&self) -> u32 {
        self.precedence
    }

    pub fn apply(&self, operand: &Value) -> Result<Value, EvalError> {
        (self.apply)(operand).map_err(|e| EvalError::Operator {
            op: self.name.clone(),
            source: Box::new(e),
        })
    }
}
