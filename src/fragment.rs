//! Compilable fragments: field references, function calls and time buckets.

use crate::error::{BuildError, BuildResult};
use crate::value::duration_token;
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// Anything that renders to a piece of InfluxQL text.
pub trait Compile: fmt::Debug {
    fn compile(&self) -> BuildResult<String>;
}

impl<T: Compile + ?Sized> Compile for &T {
    fn compile(&self) -> BuildResult<String> {
        (**self).compile()
    }
}

impl<T: Compile + ?Sized> Compile for Box<T> {
    fn compile(&self) -> BuildResult<String> {
        (**self).compile()
    }
}

/// Owned, type-erased fragment as stored by functions and statements.
pub type Fragment = Box<dyn Compile + Send + Sync>;

/// Compile any fragment. The first failure in a nested tree is returned as is.
pub fn compile_fragment(fragment: &dyn Compile) -> BuildResult<String> {
    fragment.compile()
}

/// Double-quote a field or measurement name unless it is already quoted or
/// qualified (contains `"` or `.`).
pub(crate) fn quote_identifier(name: &str) -> Cow<'_, str> {
    if name.contains('"') || name.contains('.') {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name))
    }
}

/// Double-quote an alias, escaping `\`, `"` and control characters the way
/// Go's `%q` does.
fn quote_alias(alias: &str) -> String {
    let mut out = String::with_capacity(alias.len() + 2);
    out.push('"');
    for c in alias.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if (c as u32) < 0x80 && c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A field or measurement reference, or a nested fragment standing in its place
/// (e.g. `MEAN("value")` in a field list).
#[derive(Debug)]
pub enum Literal {
    Name(String),
    Nested(Fragment),
}

impl Compile for Literal {
    fn compile(&self) -> BuildResult<String> {
        match self {
            Literal::Name(name) => Ok(quote_identifier(name).into_owned()),
            Literal::Nested(fragment) => fragment.compile(),
        }
    }
}

impl From<&str> for Literal {
    fn from(name: &str) -> Self {
        Literal::Name(name.to_string())
    }
}

impl From<String> for Literal {
    fn from(name: String) -> Self {
        Literal::Name(name)
    }
}

impl From<Function> for Literal {
    fn from(f: Function) -> Self {
        Literal::Nested(Box::new(f))
    }
}

impl From<TimeBucket> for Literal {
    fn from(t: TimeBucket) -> Self {
        Literal::Nested(Box::new(t))
    }
}

/// A function call such as `TOP("water_level", 3) AS "top3"`.
#[derive(Debug)]
pub struct Function {
    name: String,
    args: Vec<Fragment>,
    alias: Option<String>,
}

impl Function {
    pub fn new(name: impl Into<String>, args: Vec<Fragment>) -> Self {
        Self {
            name: name.into(),
            args,
            alias: None,
        }
    }

    /// Append one more argument.
    pub fn arg(mut self, arg: impl Compile + Send + Sync + 'static) -> Self {
        self.args.push(Box::new(arg));
        self
    }

    /// Render as `NAME(...) AS "alias"`.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Compile for Function {
    fn compile(&self) -> BuildResult<String> {
        if self.name.is_empty() {
            return Err(BuildError::MissingFunctionName);
        }

        let args = self
            .args
            .iter()
            .map(|arg| arg.compile())
            .collect::<BuildResult<Vec<_>>>()?;

        let mut call = format!("{}({})", self.name, args.join(", "));
        if let Some(alias) = self.alias.as_deref().filter(|a| !a.is_empty()) {
            call.push_str(" AS ");
            call.push_str(&quote_alias(alias));
        }
        Ok(call)
    }
}

/// `time(<interval>)` for GROUP BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBucket(pub Duration);

impl Compile for TimeBucket {
    fn compile(&self) -> BuildResult<String> {
        Ok(format!("time({})", duration_token(self.0)))
    }
}
