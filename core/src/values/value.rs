use crate::syntax::string_literal::{QuoteStyle, escape_string};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use core::fmt;
use std::sync::Arc;

/// Variable bindings supplied by the caller for one evaluation.
pub type Variables = hashbrown::HashMap<String, Value>;

/// A dynamically-typed runtime value.
///
/// Values are immutable and cheap to clone: strings and arrays are shared
/// behind an `Arc`, so a value stored in the result cache can be handed out to
/// any number of callers without copying.
#[derive(Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),
    Time(DateTime<FixedOffset>),
    Array(Arc<[Value]>),
}

impl Value {
    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    pub fn array(elements: impl Into<Vec<Value>>) -> Self {
        Value::Array(Arc::from(elements.into()))
    }

    /// Name of the value's dynamic type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Time(_) => "time",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    /// Rough heap footprint in bytes, used for cache accounting.
    pub fn approx_size(&self) -> usize {
        let inline = size_of::<Value>();
        match self {
            Value::Str(s) => inline + s.len(),
            Value::Array(elements) => {
                inline + elements.iter().map(Value::approx_size).sum::<usize>()
            }
            _ => inline,
        }
    }

    /// Writes a type-tagged rendering of the value.
    ///
    /// Unlike [`Display`](fmt::Display), two values of different types never
    /// share a tagged form (`n:1` vs `s:1`), which makes it suitable as a cache
    /// key component.
    pub fn write_tagged(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            Value::Null => out.write_str("z:"),
            Value::Bool(b) => write!(out, "b:{}", b),
            Value::Number(n) => write!(out, "n:{}", n),
            Value::Str(s) => {
                out.write_str("s:")?;
                escape_string(out, s, QuoteStyle::AlwaysDouble)
            }
            Value::Time(t) => write!(out, "t:{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Array(elements) => {
                out.write_str("a:[")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        out.write_char(',')?;
                    }
                    elem.write_tagged(out)?;
                }
                out.write_char(']')
            }
        }
    }
}

/// Generic string form: strings are written without quotes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", elem)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Literal form: strings are quoted and escaped.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => escape_string(f, s, QuoteStyle::PreferDouble),
            Value::Time(t) => write!(f, "date({:?})", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Value::Time(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
