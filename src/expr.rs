//! WHERE-clause conditions and the AND/OR keywords that chain them.
//!
//! A condition accepts three calling conventions:
//!
//! ```text
//! "location = ?"   + ["Toronto"]  ->  location = 'Toronto'
//! "location"       + ["Toronto"]  ->  "location" = 'Toronto'
//! "altitude >="    + [500]        ->  "altitude" >= 500
//! ```
//!
//! The two shorthand forms are first rewritten into the explicit placeholder
//! form, so substitution only ever sees `field operator ?` text.

use crate::error::{BuildError, BuildResult};
use crate::fragment::{quote_identifier, Compile};
use crate::value::{compile_value, Value};
use std::borrow::Cow;
use tracing::trace;

/// The positional placeholder recognised inside condition expressions.
pub const PLACEHOLDER: char = '?';

/// Fixed keyword text joining conditions in a WHERE chain.
#[derive(Debug, PartialEq, Eq)]
pub struct Keyword(&'static str);

pub static AND: Keyword = Keyword("AND");
pub static OR: Keyword = Keyword("OR");

impl Compile for Keyword {
    fn compile(&self) -> BuildResult<String> {
        Ok(self.0.to_string())
    }
}

/// A single WHERE term: an expression plus the values bound into it.
#[derive(Debug)]
pub struct Condition {
    expr: String,
    values: Vec<Value>,
}

impl Condition {
    pub fn new(expr: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            expr: expr.into(),
            values,
        }
    }
}

impl Compile for Condition {
    fn compile(&self) -> BuildResult<String> {
        compile_condition(&self.expr, &self.values)
    }
}

/// Normalize `expr` to the explicit placeholder form and bind `values` into it.
pub fn compile_condition(expr: &str, values: &[Value]) -> BuildResult<String> {
    let placeholders = expr.matches(PLACEHOLDER).count();

    let canonical: Cow<'_, str> = if placeholders > 0 {
        if placeholders != values.len() {
            return Err(BuildError::PlaceholderCountMismatch {
                placeholders,
                values: values.len(),
            });
        }
        trace!(expr, placeholders, "explicit placeholder condition");
        Cow::Borrowed(expr)
    } else if !values.is_empty() {
        let rewritten = rewrite_shorthand(expr, values.len())?;
        trace!(expr, rewritten = %rewritten, "shorthand condition");
        Cow::Owned(rewritten)
    } else {
        trace!(expr, "literal condition");
        return Ok(expr.to_string());
    };

    let compiled = values
        .iter()
        .map(compile_value)
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(substitute(&canonical, &compiled))
}

/// Turn `field` or `field op` into `"field" = ?` / `"field" op ?`.
fn rewrite_shorthand(expr: &str, value_count: usize) -> BuildResult<String> {
    let tokens: Vec<&str> = expr.split_whitespace().collect();

    let (field, op) = match tokens.as_slice() {
        [] => return Err(BuildError::MissingStatement),
        [field] => (*field, "="),
        [field, op] => (*field, *op),
        _ => return Err(BuildError::UnsupportedShorthandExpression(expr.to_string())),
    };

    if value_count != 1 {
        return Err(BuildError::ShorthandValueCountMismatch {
            expr: expr.to_string(),
            values: value_count,
        });
    }

    Ok(format!("{} {} {}", quote_identifier(field), op, PLACEHOLDER))
}

/// Replace placeholders left to right. Text coming from `compiled` is never
/// rescanned, so a `?` inside a bound string stays as it is.
fn substitute(expr: &str, compiled: &[String]) -> String {
    let extra: usize = compiled.iter().map(String::len).sum();
    let mut out = String::with_capacity(expr.len() + extra);
    let mut next = compiled.iter();

    for c in expr.chars() {
        if c == PLACEHOLDER {
            if let Some(text) = next.next() {
                out.push_str(text);
                continue;
            }
        }
        out.push(c);
    }
    out
}
