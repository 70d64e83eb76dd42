//! Literal values bound into conditions and function parameters.

use crate::error::BuildResult;
use crate::fragment::{Compile, Fragment};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::time::Duration;

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// A host value tagged by kind.
///
/// The `Other` arm holds the `Display` form of an arbitrary value and is
/// rendered single-quoted. It is a weak fallback: nothing about the text is
/// checked or escaped.
#[derive(Debug)]
pub enum Value {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Timestamp(DateTime<Utc>),
    /// A function call, condition or any other compilable fragment
    Nested(Fragment),
    Other(String),
}

impl Value {
    pub fn other(value: impl fmt::Display) -> Self {
        Value::Other(value.to_string())
    }

    pub fn nested(fragment: impl Compile + Send + Sync + 'static) -> Self {
        Value::Nested(Box::new(fragment))
    }
}

/// Compile a single value into its literal text.
///
/// Strings are wrapped in single quotes verbatim; embedded quotes are NOT
/// escaped, so callers must not pass untrusted text here.
pub fn compile_value(value: &Value) -> BuildResult<String> {
    let text = match value {
        Value::String(s) => format!("'{}'", s),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        // NaN and infinities have no bare InfluxQL token
        Value::Float(f) => format!("'{}'", f),
        Value::Bool(b) => b.to_string(),
        Value::Duration(d) => duration_token(*d),
        Value::Timestamp(t) => format!("'{}'", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Value::Nested(fragment) => fragment.compile()?,
        Value::Other(s) => format!("'{}'", s),
    };
    Ok(text)
}

impl Compile for Value {
    fn compile(&self) -> BuildResult<String> {
        compile_value(self)
    }
}

/// Render a duration in the largest whole unit that divides it evenly,
/// trying hours, then minutes, then seconds, else nanoseconds.
pub(crate) fn duration_token(d: Duration) -> String {
    let ns = d.as_nanos();
    if ns % NANOS_PER_HOUR == 0 {
        format!("{}h", ns / NANOS_PER_HOUR)
    } else if ns % NANOS_PER_MINUTE == 0 {
        format!("{}m", ns / NANOS_PER_MINUTE)
    } else if ns % NANOS_PER_SECOND == 0 {
        format!("{}s", ns / NANOS_PER_SECOND)
    } else {
        format!("{}ns", ns)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::UInt(n as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<crate::fragment::Function> for Value {
    fn from(f: crate::fragment::Function) -> Self {
        Value::nested(f)
    }
}

impl From<crate::fragment::TimeBucket> for Value {
    fn from(t: crate::fragment::TimeBucket) -> Self {
        Value::nested(t)
    }
}

impl From<crate::expr::Condition> for Value {
    fn from(c: crate::expr::Condition) -> Self {
        Value::nested(c)
    }
}

/// Build a `Vec<Value>` from heterogeneous literals.
///
/// ```
/// use influxql_builder::values;
/// let bound = values!["Toronto", 500];
/// assert_eq!(bound.len(), 2);
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($v:expr),+ $(,)?) => {
        vec![$($crate::Value::from($v)),+]
    };
}
