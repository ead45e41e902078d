//! The Brisk evaluation engine.

use super::{CancelReason, Config, EngineError, ParallelError};
use crate::cache::{self, CacheStats, ResultCache, SWEEP_INTERVAL};
use crate::evaluator::EvalError;
use crate::lexer::tokenize;
use crate::parser::{Node, parse};
use crate::registry::{NativeFunction, Registry, RegistryError, Validator};
use crate::stdlib::register_builtins;
use crate::validator::{self, ValidationError, check_token_sequence, validate_expression};
use crate::values::{Value, Variables};
use std::any::Any;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// The Brisk expression engine.
///
/// An engine owns the operator/function registry and the result cache. It is
/// meant to be created once and shared; every method takes `&self` and is
/// safe to call concurrently, registration included.
///
/// Each `evaluate` call runs the pipeline
///
/// ```text
/// validate ─▶ cache lookup ─▶ tokenize ─▶ parse ─▶ [strict check] ─▶ evaluate ─▶ cache store
/// ```
///
/// and reports failures as an [`EngineError`] naming the stage.
///
/// # Cancellation
///
/// Tree evaluation runs on a blocking worker thread. The engine waits for it,
/// the caller's token, and the configured deadline, whichever comes first.
/// When the wait is cancelled the worker's own child token is cancelled too;
/// the worker notices at the next node and stops. The engine does not join
/// it: a host function that blocks internally runs to completion on its own,
/// and its result is discarded.
pub struct Engine {
    config: Config,
    registry: Arc<Registry>,
    cache: Option<Arc<ResultCache>>,
    sweeper: Option<JoinHandle<()>>,
}

impl Engine {
    /// Create an engine with the built-in operators and functions.
    ///
    /// When called inside a tokio runtime with caching enabled, a background
    /// task purges expired cache entries every five minutes.
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(Registry::new());
        // A fresh registry has no names to collide with.
        if let Err(e) = register_builtins(&registry) {
            tracing::error!(error = %e, "failed to register built-ins");
        }

        let cache = config
            .cache_enabled
            .then(|| Arc::new(ResultCache::new(config.cache_size, config.cache_ttl)));
        let sweeper = cache
            .as_ref()
            .and_then(|cache| cache::spawn_sweeper(cache, SWEEP_INTERVAL));

        tracing::debug!(?config, sweeper = sweeper.is_some(), "engine created");
        Self {
            config,
            registry,
            cache,
            sweeper,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Cache counters, or `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Register a host function.
    ///
    /// Fails if the name is taken, is not an identifier, or custom
    /// registrations are disabled.
    pub fn register_function(
        &self,
        name: &str,
        native: NativeFunction,
        validator: Option<Validator>,
    ) -> Result<(), RegistryError> {
        self.check_custom_allowed(name)?;
        self.registry.register_function(name, native, validator)
    }

    /// Register a binary operator. The name must be operator text the lexer
    /// produces (for example `&` or `>=`).
    pub fn register_operator(
        &self,
        name: &str,
        precedence: u32,
        apply: impl Fn(&Value, &Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        self.check_custom_allowed(name)?;
        self.registry.register_operator(name, precedence, apply)
    }

    fn check_custom_allowed(&self, name: &str) -> Result<(), RegistryError> {
        if self.config.allow_custom {
            Ok(())
        } else {
            Err(RegistryError::CustomDisabled {
                name: name.to_string(),
            })
        }
    }

    /// Check an expression without evaluating it.
    pub fn validate_syntax(&self, expr: &str) -> Result<(), ValidationError> {
        validator::validate_syntax(expr, &self.registry, &self.config)
    }

    /// Evaluate `expr` against `vars`.
    pub async fn evaluate(
        &self,
        ctx: &CancellationToken,
        expr: &str,
        vars: &Variables,
    ) -> Result<Value, EngineError> {
        // A timeout too large to represent as an instant means no deadline.
        let deadline = self
            .config
            .deadline()
            .and_then(|d| Instant::now().checked_add(d).map(|at| (at, d)));
        if ctx.is_cancelled() {
            return Err(EngineError::Cancelled(CancelReason::Caller));
        }

        self.validate_input(expr, vars)?;

        let key = self.cache.as_ref().map(|_| cache::cache_key(expr, vars));
        if let (Some(cache), Some(key)) = (&self.cache, &key)
            && let Some(value) = cache.get(key)
        {
            tracing::debug!(expr, "cache hit");
            return Ok(value);
        }

        let tokens = tokenize(expr)?;
        let node = parse(&tokens, &self.registry, self.config.max_depth)?;
        if self.config.strict_mode {
            check_token_sequence(&tokens)?;
        }
        tracing::trace!(expr, tree = %node, "parsed expression");

        let value = self.evaluate_with_recovery(ctx, node, vars, deadline).await?;

        if let (Some(cache), Some(key)) = (&self.cache, key)
            && let Err(e) = cache.set(&key, value.clone())
        {
            if self.config.strict_mode {
                return Err(e.into());
            }
            tracing::warn!(expr, error = %e, "failed to cache result");
        }
        Ok(value)
    }

    /// Evaluate several expressions concurrently against the same bindings.
    ///
    /// Every expression runs to completion. If any fail, the error lists all
    /// failures with their input index; otherwise values come back in input
    /// order.
    pub async fn evaluate_parallel(
        &self,
        ctx: &CancellationToken,
        exprs: &[&str],
        vars: &Variables,
    ) -> Result<Vec<Value>, EngineError> {
        let results =
            futures::future::join_all(exprs.iter().map(|expr| self.evaluate(ctx, expr, vars)))
                .await;

        let mut values = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(value) => values.push(value),
                Err(e) => failures.push((index, e)),
            }
        }

        if failures.is_empty() {
            Ok(values)
        } else {
            Err(ParallelError {
                total: exprs.len(),
                failures,
            }
            .into())
        }
    }

    fn validate_input(&self, expr: &str, vars: &Variables) -> Result<(), ValidationError> {
        validate_expression(expr, self.config.max_string_length, self.config.max_depth)?;

        for (name, value) in vars {
            if let Some(elements) = value.as_array()
                && elements.len() > self.config.max_array_length
            {
                return Err(ValidationError::ArrayTooLong {
                    name: name.clone(),
                    len: elements.len(),
                    max: self.config.max_array_length,
                });
            }
        }
        Ok(())
    }

    async fn evaluate_with_recovery(
        &self,
        ctx: &CancellationToken,
        node: Node,
        vars: &Variables,
        deadline: Option<(Instant, std::time::Duration)>,
    ) -> Result<Value, EngineError> {
        let worker_ctx = ctx.child_token();
        let mut worker = {
            let token = worker_ctx.clone();
            let registry = Arc::clone(&self.registry);
            let vars = vars.clone();
            tokio::task::spawn_blocking(move || node.evaluate(&token, &vars, &registry))
        };

        let expired = async {
            match deadline {
                Some((at, _)) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        let joined = tokio::select! {
            joined = &mut worker => joined,
            _ = ctx.cancelled() => {
                worker_ctx.cancel();
                tracing::debug!("evaluation cancelled by caller");
                return Err(EngineError::Cancelled(CancelReason::Caller));
            }
            _ = expired => {
                worker_ctx.cancel();
                let after = deadline.map(|(_, d)| d).unwrap_or_default();
                tracing::debug!(?after, "evaluation timed out");
                return Err(EngineError::Cancelled(CancelReason::Timeout(after)));
            }
        };

        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(EvalError::Cancelled)) => Err(EngineError::Cancelled(CancelReason::Caller)),
            Ok(Err(e)) => Err(e.into()),
            Err(e) if e.is_panic() => {
                let message = panic_message(e.into_panic());
                tracing::warn!(%message, "recovered panic during evaluation");
                Err(EngineError::Internal(message))
            }
            Err(e) => Err(EngineError::Internal(e.to_string())),
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic with a non-string payload".to_string()
    }
}
