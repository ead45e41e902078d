//! Name-to-behavior tables for functions and operators.
//!
//! The registry is shared by every evaluation on an engine. Lookups take a
//! shared read lock and clone out an `Arc`, so concurrent evaluations never
//! serialize on each other and a slow host function never holds a lock.
//! Registration takes the write lock. Names are append-only: the first
//! registration of a name wins and later ones are rejected.

mod function;

#[cfg(test)]
mod registry_test;

pub use function::{
    Arity, BinaryHandler, Function, Handler, NativeFunction, Operator, PrefixHandler,
    PrefixOperator, Validator,
};

use crate::evaluator::EvalError;
use crate::lexer::{SINGLE_CHAR_OPERATORS, TWO_CHAR_OPERATORS};
use crate::values::Value;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised when registering functions or operators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} '{name}' is already registered")]
    Duplicate { kind: &'static str, name: String },

    #[error("'{name}' is not a valid {kind} name")]
    InvalidName { kind: &'static str, name: String },

    #[error("custom registrations are disabled (tried to register '{name}')")]
    CustomDisabled { name: String },
}

#[derive(Default)]
pub struct Registry {
    functions: RwLock<HashMap<String, Arc<Function>>>,
    operators: RwLock<HashMap<String, Arc<Operator>>>,
    prefix_operators: RwLock<HashMap<String, Arc<PrefixOperator>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_function(
        &self,
        name: &str,
        native: NativeFunction,
        validator: Option<Validator>,
    ) -> Result<(), RegistryError> {
        if !is_identifier(name) {
            return Err(RegistryError::InvalidName {
                kind: "function",
                name: name.to_string(),
            });
        }

        let mut functions = self.functions.write();
        if functions.contains_key(name) {
            return Err(RegistryError::Duplicate {
                kind: "function",
                name: name.to_string(),
            });
        }
        let function = Function::new(name.to_string(), native, validator);
        functions.insert(name.to_string(), Arc::new(function));
        tracing::debug!(name, "registered function");
        Ok(())
    }

    pub fn register_operator(
        &self,
        name: &str,
        precedence: u32,
        apply: impl Fn(&Value, &Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        if !is_operator_text(name) {
            return Err(RegistryError::InvalidName {
                kind: "operator",
                name: name.to_string(),
            });
        }

        let mut operators = self.operators.write();
        if operators.contains_key(name) {
            return Err(RegistryError::Duplicate {
                kind: "operator",
                name: name.to_string(),
            });
        }
        let operator = Operator::new(name.to_string(), precedence, Arc::new(apply));
        operators.insert(name.to_string(), Arc::new(operator));
        tracing::debug!(name, precedence, "registered operator");
        Ok(())
    }

    pub fn register_prefix_operator(
        &self,
        name: &str,
        precedence: u32,
        apply: impl Fn(&Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        if !crate::lexer::PREFIX_OPERATORS.contains(&name) {
            return Err(RegistryError::InvalidName {
                kind: "prefix operator",
                name: name.to_string(),
            });
        }

        let mut prefix_operators = self.prefix_operators.write();
        if prefix_operators.contains_key(name) {
            return Err(RegistryError::Duplicate {
                kind: "prefix operator",
                name: name.to_string(),
            });
        }
        let operator = PrefixOperator::new(name.to_string(), precedence, Arc::new(apply));
        prefix_operators.insert(name.to_string(), Arc::new(operator));
        tracing::debug!(name, precedence, "registered prefix operator");
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<Arc<Function>> {
        self.functions.read().get(name).cloned()
    }

    pub fn operator(&self, name: &str) -> Option<Arc<Operator>> {
        self.operators.read().get(name).cloned()
    }

    pub fn prefix_operator(&self, name: &str) -> Option<Arc<PrefixOperator>> {
        self.prefix_operators.read().get(name).cloned()
    }

    /// Registered function names, sorted.
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered binary operator names, sorted by precedence then name.
    pub fn operator_names(&self) -> Vec<(String, u32)> {
        let mut names: Vec<(String, u32)> = self
            .operators
            .read()
            .values()
            .map(|op| (op.name().to_string(), op.precedence()))
            .collect();
        names.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        names
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_operator_text(name: &str) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => SINGLE_CHAR_OPERATORS.contains(&c),
        (Some(_), Some(_)) => TWO_CHAR_OPERATORS.contains(&name),
        _ => false,
    }
}
