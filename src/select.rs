//! SELECT statement assembly.
//!
//! The builder only stores fragments; nothing is compiled until [`SelectBuilder::build`],
//! which is also the only step that can fail.

use crate::error::BuildResult;
use crate::expr::{Condition, Keyword, AND, OR};
use crate::fragment::{Compile, Fragment, Literal};
use crate::template::SelectTemplateValues;
use crate::value::Value;
use std::fmt;
use tracing::debug;

/// Gap-filling policy for `GROUP BY time(...)` queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Null,
    None,
    Previous,
    Linear,
    Int(i64),
    Float(f64),
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Null => write!(f, "null"),
            Fill::None => write!(f, "none"),
            Fill::Previous => write!(f, "previous"),
            Fill::Linear => write!(f, "linear"),
            Fill::Int(n) => write!(f, "{}", n),
            Fill::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<i32> for Fill {
    fn from(n: i32) -> Self {
        Fill::Int(n as i64)
    }
}

impl From<i64> for Fill {
    fn from(n: i64) -> Self {
        Fill::Int(n)
    }
}

impl From<f64> for Fill {
    fn from(x: f64) -> Self {
        Fill::Float(x)
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    fn keyword(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// A SELECT statement under construction.
#[derive(Debug, Default)]
pub struct SelectBuilder {
    fields: Vec<Literal>,
    measurement: Option<Literal>,
    where_terms: Vec<Fragment>,
    group_by: Vec<Literal>,
    order_by: Vec<(Literal, Order)>,
    fill: Option<Fill>,
    limit: Option<u64>,
    offset: Option<u64>,
    slimit: Option<u64>,
    soffset: Option<u64>,
}

/// Start a SELECT over the given fields.
pub fn select<I, F>(fields: I) -> SelectBuilder
where
    I: IntoIterator<Item = F>,
    F: Into<Literal>,
{
    SelectBuilder {
        fields: fields.into_iter().map(Into::into).collect(),
        ..Default::default()
    }
}

impl SelectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one more field, function call or other fragment to the field list.
    pub fn field(&mut self, field: impl Into<Literal>) -> &mut Self {
        self.fields.push(field.into());
        self
    }

    /// `FROM <measurement>`
    pub fn from(&mut self, measurement: impl Into<String>) -> &mut Self {
        self.measurement = Some(Literal::Name(measurement.into()));
        self
    }

    /// Replace the WHERE chain with a single condition.
    pub fn filter(&mut self, expr: impl Into<String>, values: Vec<Value>) -> &mut Self {
        self.where_terms.clear();
        self.where_terms.push(Box::new(Condition::new(expr, values)));
        self
    }

    /// Append `AND <condition>`.
    pub fn and(&mut self, expr: impl Into<String>, values: Vec<Value>) -> &mut Self {
        self.push_joined(&AND, Condition::new(expr, values))
    }

    /// Append `OR <condition>`.
    pub fn or(&mut self, expr: impl Into<String>, values: Vec<Value>) -> &mut Self {
        self.push_joined(&OR, Condition::new(expr, values))
    }

    fn push_joined(&mut self, keyword: &'static Keyword, condition: Condition) -> &mut Self {
        // a leading AND/OR would leave a dangling keyword after WHERE
        if !self.where_terms.is_empty() {
            self.where_terms.push(Box::new(keyword));
        }
        self.where_terms.push(Box::new(condition));
        self
    }

    /// `GROUP BY <field | time(...)>`, appended to any previous entries.
    pub fn group_by(&mut self, field: impl Into<Literal>) -> &mut Self {
        self.group_by.push(field.into());
        self
    }

    pub fn fill(&mut self, fill: impl Into<Fill>) -> &mut Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn order_by(&mut self, field: impl Into<Literal>, order: Order) -> &mut Self {
        self.order_by.push((field.into(), order));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn slimit(&mut self, slimit: u64) -> &mut Self {
        self.slimit = Some(slimit);
        self
    }

    pub fn soffset(&mut self, soffset: u64) -> &mut Self {
        self.soffset = Some(soffset);
        self
    }

    /// Compile every fragment and render the statement.
    pub fn build(&self) -> BuildResult<String> {
        let values = SelectTemplateValues {
            fields: compile_all(&self.fields)?,
            measurement: self.measurement.as_ref().map(Compile::compile).transpose()?,
            where_terms: compile_all(&self.where_terms)?,
            group_by: compile_all(&self.group_by)?,
            fill: self.fill.map(|f| f.to_string()),
            order_by: self
                .order_by
                .iter()
                .map(|(field, order)| Ok(format!("{} {}", field.compile()?, order.keyword())))
                .collect::<BuildResult<Vec<_>>>()?,
            limit: self.limit,
            offset: self.offset,
            slimit: self.slimit,
            soffset: self.soffset,
        };

        let statement = values.render();
        debug!(statement = %statement, "compiled select statement");
        Ok(statement)
    }
}

impl Compile for SelectBuilder {
    fn compile(&self) -> BuildResult<String> {
        self.build()
    }
}

fn compile_all<T: Compile>(fragments: &[T]) -> BuildResult<Vec<String>> {
    fragments.iter().map(Compile::compile).collect()
}
