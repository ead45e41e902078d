//! Error rendering using ariadne
//!
//! Errors that carry a source position (lexer, parser and structural
//! validation errors) are rendered with a snippet of the expression and a
//! label under the offending token. Everything else is printed as a single
//! line.

use crate::{EngineError, LexError, ParseError, Position, ValidationError};
use ariadne::{ColorGenerator, IndexType, Label, Report, ReportKind, Source};
use core::fmt::Display;
use core::ops::Range;
use std::io::Write;

const SOURCE_ID: &str = "<expr>";

/// Errors that may point into the expression text.
pub trait Locate: Display {
    /// Primary position and a short label for it.
    fn primary(&self) -> Option<(Position, String)>;

    /// A secondary position, such as the `(` a missing `)` should close.
    fn related(&self) -> Option<(Position, String)> {
        None
    }
}

impl Locate for LexError {
    fn primary(&self) -> Option<(Position, String)> {
        let label = match self {
            LexError::UnexpectedChar { .. } => "unexpected character",
            LexError::UnterminatedString { .. } => "string starts here",
            LexError::InvalidEscape { .. } => "invalid escape",
            LexError::UnknownOperator { .. } => "unknown operator",
        };
        Some((self.position(), label.to_string()))
    }
}

impl Locate for ParseError {
    fn primary(&self) -> Option<(Position, String)> {
        let label = match self {
            ParseError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
            ParseError::MissingClosingParen { .. } => "expected ')'".to_string(),
            ParseError::InvalidNumber { .. } => "invalid number".to_string(),
            ParseError::UnknownOperator { .. } => "not a binary operator".to_string(),
            ParseError::EmptyArgument { .. } => "empty argument".to_string(),
            ParseError::MaxDepthExceeded { .. } => "nested too deeply".to_string(),
        };
        Some((self.position(), label))
    }

    fn related(&self) -> Option<(Position, String)> {
        match self {
            ParseError::MissingClosingParen { open, .. } => {
                Some((*open, "unclosed '(' opened here".to_string()))
            }
            _ => None,
        }
    }
}

impl Locate for ValidationError {
    fn primary(&self) -> Option<(Position, String)> {
        match self {
            ValidationError::UnbalancedParens { pos } => Some((*pos, "no matching '('".to_string())),
            ValidationError::ConsecutiveOperators { pos, first, .. } => {
                Some((*pos, format!("operator follows '{}'", first)))
            }
            ValidationError::UnexpectedSequence { pos, after, .. } => {
                Some((*pos, format!("not allowed after {}", after)))
            }
            ValidationError::Lex(e) => e.primary(),
            ValidationError::Parse(e) => e.primary(),
            _ => None,
        }
    }

    fn related(&self) -> Option<(Position, String)> {
        match self {
            ValidationError::Parse(e) => e.related(),
            _ => None,
        }
    }
}

impl Locate for EngineError {
    fn primary(&self) -> Option<(Position, String)> {
        match self {
            EngineError::Validation(e) => e.primary(),
            EngineError::Lex(e) => e.primary(),
            EngineError::Parse(e) => e.primary(),
            _ => None,
        }
    }

    fn related(&self) -> Option<(Position, String)> {
        match self {
            EngineError::Validation(e) => e.related(),
            EngineError::Parse(e) => e.related(),
            _ => None,
        }
    }
}

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use brisk::{Config, Engine, render_error};
///
/// let engine = Engine::new(Config::default());
/// let source = "(1 + 2";
/// if let Err(e) = engine.validate_syntax(source) {
///     render_error(source, &e);
/// }
/// ```
pub fn render_error(source: &str, error: &impl Locate) {
    render_error_to_writer(source, error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(
    source: &str,
    error: &impl Locate,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    render_error_to_writer(source, error, writer, true)
}

/// Render an error to a String (useful for logs and UIs)
pub fn render_error_to_string(source: &str, error: &impl Locate) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(source: &str, error: &impl Locate) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    source: &str,
    error: &impl Locate,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let Some((pos, label)) = error.primary() else {
        return writeln!(writer, "Error: {}", error);
    };

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let message = error.to_string();
    let span = span_at(source, pos);
    let mut report = Report::build(ReportKind::Error, (SOURCE_ID, span.clone()))
        .with_message(&message)
        .with_config(
            ariadne::Config::default()
                .with_color(use_color)
                .with_index_type(IndexType::Byte),
        )
        .with_label(
            Label::new((SOURCE_ID, span))
                .with_message(label)
                .with_color(colors.next()),
        );

    if let Some((related, label)) = error.related() {
        report = report.with_label(
            Label::new((SOURCE_ID, span_at(source, related)))
                .with_message(label)
                .with_color(colors.next()),
        );
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}

/// One-character span at `pos`, clamped to the source.
fn span_at(source: &str, pos: Position) -> Range<usize> {
    let start = pos.offset.min(source.len());
    let end = source[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CancellationToken, Config, Engine, Variables};

    #[test]
    fn test_render_missing_paren() {
        let engine = Engine::new(Config::default());
        let source = "(1 + 2";
        let err = engine.validate_syntax(source).unwrap_err();
        let output = render_error_to_string_no_color(source, &err);

        assert!(output.contains("Error"));
        assert!(output.contains("(1 + 2"));
        assert!(output.contains("unclosed '(' opened here"));
    }

    #[test]
    fn test_render_lex_error() {
        let engine = Engine::new(Config::default());
        let source = "price # 2";
        let err = engine.validate_syntax(source).unwrap_err();
        let output = render_error_to_string_no_color(source, &err);

        assert!(output.contains("unexpected character '#'"));
        assert!(output.contains("price # 2"));
    }

    #[tokio::test]
    async fn test_render_engine_error_without_position() {
        let engine = Engine::new(Config::default());
        let source = "missing + 1";
        let err = engine
            .evaluate(&CancellationToken::new(), source, &Variables::new())
            .await
            .unwrap_err();
        let output = render_error_to_string_no_color(source, &err);

        assert_eq!(
            output,
            "Error: evaluation error: undefined variable 'missing'\n"
        );
    }

    #[test]
    fn test_render_consecutive_operators() {
        let engine = Engine::new(Config::default());
        let source = "1 + * 2";
        let err = engine.validate_syntax(source).unwrap_err();
        let output = render_error_to_string_no_color(source, &err);
        assert!(output.contains("operator follows '+'"));
    }

    #[test]
    fn test_span_is_clamped_to_source() {
        let pos = |offset| Position {
            line: 1,
            col: offset + 1,
            offset,
        };
        assert_eq!(span_at("abc", pos(1)), 1..2);
        assert_eq!(span_at("abc", pos(3)), 3..3);
        assert_eq!(span_at("abc", pos(10)), 3..3);
        assert_eq!(span_at("é!", pos(0)), 0..2);
    }

    #[test]
    fn test_render_to_string_uses_color() {
        let source = "(1))";
        let err = ValidationError::UnbalancedParens { pos: Position { line: 1, col: 4, offset: 3 } };
        let plain = render_error_to_string_no_color(source, &err);
        let colored = render_error_to_string(source, &err);
        assert!(plain.contains("no matching '('"));
        assert!(colored.len() >= plain.len());
    }
}
