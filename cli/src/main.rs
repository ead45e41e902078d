use brisk::{CancellationToken, Config, Engine, Value, Variables, render_error};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use std::io::BufRead;
use std::io::BufReader;
use std::time::Duration;

/// Brisk - a small, embeddable expression engine
#[derive(Parser, Debug)]
#[command(name = "brisk")]
#[command(about = "Evaluate and check Brisk expressions", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression (reads one expression per line from stdin if none is given)
    Eval {
        /// Expression to evaluate
        expression: Option<String>,

        /// Bind a variable, e.g. `--var price=12.5 --var name=bob`
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, Value)>,

        #[command(flatten)]
        limits: Limits,

        /// Evaluation timeout in milliseconds (0 disables it)
        #[arg(long, env = "BRISK_TIMEOUT_MS", default_value_t = 5000)]
        timeout_ms: u64,

        /// Do not cache results
        #[arg(long)]
        no_cache: bool,
    },

    /// Check an expression's syntax without evaluating it
    Check {
        expression: String,

        #[command(flatten)]
        limits: Limits,
    },

    /// List the registered functions and operators
    Functions,
}

#[derive(clap::Args, Debug)]
struct Limits {
    /// Enable the strict token-sequence check
    #[arg(long, env = "BRISK_STRICT")]
    strict: bool,

    /// Maximum nesting depth
    #[arg(long, env = "BRISK_MAX_DEPTH", default_value_t = 10)]
    max_depth: usize,
}

impl Limits {
    fn apply(&self, config: Config) -> Config {
        config
            .with_strict_mode(self.strict)
            .with_max_depth(self.max_depth)
    }
}

/// Parse a `name=value` binding. Values are numbers, `true`/`false`, or
/// strings.
fn parse_var(s: &str) -> Result<(String, Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{}'", s));
    }

    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::str(raw),
        },
    };
    Ok((name.to_string(), value))
}

async fn evaluate_line(
    engine: &Engine,
    ctx: &CancellationToken,
    input: &str,
    vars: &Variables,
) -> bool {
    match engine.evaluate(ctx, input, vars).await {
        Ok(value) => {
            println!("{:?}", value);
            true
        }
        Err(e) => {
            tracing::debug!(stage = %e.stage(), "evaluation failed");
            render_error(input, &e);
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let ok = match args.command {
        Command::Eval {
            expression,
            vars,
            limits,
            timeout_ms,
            no_cache,
        } => {
            let config = limits
                .apply(Config::default())
                .with_timeout(Duration::from_millis(timeout_ms))
                .with_cache_enabled(!no_cache);
            let engine = Engine::new(config);
            let vars: Variables = vars.into_iter().collect();

            // Ctrl+C cancels whatever is running.
            let ctx = CancellationToken::new();
            tokio::spawn({
                let ctx = ctx.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        ctx.cancel();
                    }
                }
            });

            if let Some(expr) = expression {
                evaluate_line(&engine, &ctx, &expr, &vars).await
            } else {
                // Pipe/stdin mode
                let stdin = std::io::stdin();
                let reader = BufReader::new(stdin.lock());
                let mut all_ok = true;
                for line in reader.lines() {
                    let line = line.into_diagnostic()?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    all_ok &= evaluate_line(&engine, &ctx, &line, &vars).await;
                    if ctx.is_cancelled() {
                        break;
                    }
                }
                all_ok
            }
        }

        Command::Check { expression, limits } => {
            let engine = Engine::new(limits.apply(Config::default()).with_cache_enabled(false));
            match engine.validate_syntax(&expression) {
                Ok(()) => {
                    println!("ok");
                    true
                }
                Err(e) => {
                    render_error(&expression, &e);
                    false
                }
            }
        }

        Command::Functions => {
            let engine = Engine::new(Config::default().with_cache_enabled(false));
            let registry = engine.registry();
            println!("functions:");
            for name in registry.function_names() {
                println!("  {}", name);
            }
            println!("operators:");
            for (name, precedence) in registry.operator_names() {
                println!("  {:<3} precedence {}", name, precedence);
            }
            true
        }
    };

    if ok {
        Ok(())
    } else {
        Err(miette!("expression failed"))
    }
}
