use super::EvalError;
use crate::parser::Node;
use crate::registry::Registry;
use crate::values::{Value, Variables};
use tokio_util::sync::CancellationToken;

impl Node {
    /// Evaluate the tree against `vars`, resolving operators and functions
    /// through `registry`.
    ///
    /// Returns [`EvalError::Cancelled`] at the first node visited after `ctx`
    /// is cancelled.
    pub fn evaluate(
        &self,
        ctx: &CancellationToken,
        vars: &Variables,
        registry: &Registry,
    ) -> Result<Value, EvalError> {
        if ctx.is_cancelled() {
            return Err(EvalError::Cancelled);
        }

        match self {
            Node::Number(n) => Ok(Value::Number(*n)),
            Node::Str(s) => Ok(Value::Str(s.clone())),
            Node::Ident(name) => vars
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Node::BinaryOp { op, left, right } => {
                let operator = registry
                    .operator(op)
                    .ok_or_else(|| EvalError::UnknownOperator(op.clone()))?;
                let left = left.evaluate(ctx, vars, registry)?;
                let right = right.evaluate(ctx, vars, registry)?;
                operator.apply(&left, &right)
            }
            Node::Prefix { op, operand } => {
                let operator = registry
                    .prefix_operator(op)
                    .ok_or_else(|| EvalError::UnknownOperator(op.clone()))?;
                let operand = operand.evaluate(ctx, vars, registry)?;
                operator.apply(&operand)
            }
            Node::Call { name, args } => {
                let function = registry
                    .function(name)
                    .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
                let args = args
                    .iter()
                    .map(|arg| arg.evaluate(ctx, vars, registry))
                    .collect::<Result<Vec<_>, _>>()?;
                tracing::trace!(function = %name, argc = args.len(), "calling function");
                function.call(&args)
            }
        }
    }
}
