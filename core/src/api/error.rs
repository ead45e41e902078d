//! Public error types for the Brisk API.
//!
//! Every failure of [`Engine::evaluate`](super::Engine::evaluate) is an
//! [`EngineError`] whose variant identifies the stage that failed. The
//! underlying error is kept as the source.

use crate::cache::CacheError;
use crate::evaluator::EvalError;
use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::validator::ValidationError;
use core::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("tokenize error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("cache store error: {0}")]
    CacheStore(#[from] CacheError),

    /// A panic inside evaluation, recovered on the engine side.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("evaluation cancelled: {0}")]
    Cancelled(CancelReason),

    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

/// Pipeline stage an [`EngineError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validate,
    Tokenize,
    Parse,
    Evaluate,
    CacheStore,
    Internal,
    Cancelled,
    Parallel,
}

impl EngineError {
    pub fn stage(&self) -> Stage {
        match self {
            EngineError::Validation(_) => Stage::Validate,
            EngineError::Lex(_) => Stage::Tokenize,
            EngineError::Parse(_) => Stage::Parse,
            EngineError::Eval(_) => Stage::Evaluate,
            EngineError::CacheStore(_) => Stage::CacheStore,
            EngineError::Internal(_) => Stage::Internal,
            EngineError::Cancelled(_) => Stage::Cancelled,
            EngineError::Parallel(_) => Stage::Parallel,
        }
    }

    /// Whether the expression text itself is malformed, as opposed to
    /// referencing something unknown or running out of time.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self.stage(),
            Stage::Validate | Stage::Tokenize | Stage::Parse
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Tokenize => "tokenize",
            Stage::Parse => "parse",
            Stage::Evaluate => "evaluate",
            Stage::CacheStore => "cache store",
            Stage::Internal => "internal",
            Stage::Cancelled => "cancelled",
            Stage::Parallel => "parallel",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The configured timeout elapsed.
    Timeout(Duration),
    /// The caller's cancellation token fired.
    Caller,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Timeout(after) => write!(f, "timed out after {:?}", after),
            CancelReason::Caller => write!(f, "cancelled by caller"),
        }
    }
}

/// Failures of an `evaluate_parallel` call, by input index.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelError {
    pub total: usize,
    pub failures: Vec<(usize, EngineError)>,
}

impl fmt::Display for ParallelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} expressions failed",
            self.failures.len(),
            self.total
        )?;
        for (i, (index, error)) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}[{}] {}", sep, index, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParallelError {}
