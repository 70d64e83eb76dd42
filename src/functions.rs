//! Constructors for the built-in InfluxQL aggregates and selectors.
//!
//! Each one wraps its field as a [`Literal`] and any extra parameters as
//! [`Value`]s, so `top("water_level", values![3])` renders as
//! `TOP("water_level", 3)`.

use crate::fragment::{Fragment, Function, Literal, TimeBucket};
use crate::value::Value;
use std::time::Duration;

/// Any named function call.
pub fn func(name: impl Into<String>, args: Vec<Fragment>) -> Function {
    Function::new(name, args)
}

/// `time(<interval>)` for GROUP BY.
pub fn time(interval: Duration) -> TimeBucket {
    TimeBucket(interval)
}

fn field_call(name: &str, field: impl Into<Literal>) -> Function {
    Function::new(name, vec![Box::new(field.into())])
}

fn field_call_with(name: &str, field: impl Into<Literal>, params: Vec<Value>) -> Function {
    let mut args: Vec<Fragment> = Vec::with_capacity(params.len() + 1);
    args.push(Box::new(field.into()));
    args.extend(params.into_iter().map(|p| Box::new(p) as Fragment));
    Function::new(name, args)
}

macro_rules! field_functions {
    ($($(#[$doc:meta])* $fn_name:ident => $sql:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $fn_name(field: impl Into<Literal>) -> Function {
                field_call($sql, field)
            }
        )*
    };
}

macro_rules! parameterized_functions {
    ($($(#[$doc:meta])* $fn_name:ident => $sql:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $fn_name(field: impl Into<Literal>, params: Vec<Value>) -> Function {
                field_call_with($sql, field, params)
            }
        )*
    };
}

field_functions! {
    /// `COUNT(field)`
    count => "COUNT";
    /// `MEAN(field)`
    mean => "MEAN";
    /// `MEDIAN(field)`
    median => "MEDIAN";
    /// `SPREAD(field)`
    spread => "SPREAD";
    /// `SUM(field)`
    sum => "SUM";
    /// `FIRST(field)`
    first => "FIRST";
    /// `STDDEV(field)`
    stddev => "STDDEV";
    /// `LAST(field)`
    last => "LAST";
    /// `MAX(field)`
    max => "MAX";
    /// `MIN(field)`
    min => "MIN";
    /// `DISTINCT(field)`
    distinct => "DISTINCT";
}

parameterized_functions! {
    /// `BOTTOM(field, N)` and friends
    bottom => "BOTTOM";
    /// `TOP(field, N)` and friends
    top => "TOP";
    /// `DERIVATIVE(field[, unit])`
    derivative => "DERIVATIVE";
    /// `NON_NEGATIVE_DERIVATIVE(field[, unit])`
    non_negative_derivative => "NON_NEGATIVE_DERIVATIVE";
}

/// `PERCENTILE(field, p)`
pub fn percentile(field: impl Into<Literal>, p: f64) -> Function {
    field_call_with("PERCENTILE", field, vec![Value::Float(p)])
}
