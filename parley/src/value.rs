/*!
Dynamically typed result values and the converters that produce them.
*/

use std::{borrow::Cow, fmt, sync::Arc};

use joinery::JoinableIterator;
use lazy_format::lazy_format;

use crate::errors::ArgumentTypeError;

/**
A value stored in a [`Namespace`][crate::Namespace].

Lists are shared behind an [`Arc`]: cloning a namespace is cheap, and
appending to a list that is also held by an earlier clone copies it first,
so earlier snapshots never observe later appends.
*/
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Arc<Vec<Value>>),
}

impl Value {
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Arc::new(items.into_iter().collect()))
    }

    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f),
            Value::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The quoted form used in error messages and inside lists, where
    /// strings are shown as `'text'`.
    pub fn repr(&self) -> impl fmt::Display + '_ {
        lazy_format!(match (self) {
            Value::Str(s) => ("'{}'", s.replace('\'', "\\'")),
            other => ("{other}"),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{x:.1}")
            }
            Value::Float(x) if x.is_nan() => f.write_str("nan"),
            Value::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "inf" } else { "-inf" })
            }
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => write!(
                f,
                "[{}]",
                items.iter().map(|item| item.repr()).join_with(", ")
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::list(value.into_iter().map(Into::into))
    }
}

type ConvertFn = dyn Fn(&str) -> Result<Value, ArgumentTypeError> + Send + Sync;

/**
A named `str -> Value` conversion, the `type` of an action. The name shows
up in `invalid int value: 'x'` messages and, with the metavar-type help
style, as the default metavar.
*/
#[derive(Clone)]
pub struct Converter {
    name: Cow<'static, str>,
    convert: Arc<ConvertFn>,
}

impl Converter {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        convert: impl Fn(&str) -> Result<Value, ArgumentTypeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            convert: Arc::new(convert),
        }
    }

    /// Keep the token as a string.
    #[must_use]
    pub fn string() -> Self {
        Self::new("str", |s| Ok(Value::Str(s.to_owned())))
    }

    /// Parse a base-10 integer, allowing surrounding whitespace and `_`
    /// digit separators.
    #[must_use]
    pub fn int() -> Self {
        Self::new("int", |s| {
            s.trim()
                .replace('_', "")
                .parse()
                .map(Value::Int)
                .map_err(|_| ArgumentTypeError::invalid())
        })
    }

    #[must_use]
    pub fn float() -> Self {
        Self::new("float", |s| {
            s.trim()
                .parse()
                .map(Value::Float)
                .map_err(|_| ArgumentTypeError::invalid())
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn convert(&self, token: &str) -> Result<Value, ArgumentTypeError> {
        (self.convert)(token)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Converter").field(&self.name).finish()
    }
}
