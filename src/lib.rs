//! Programmatic builder for InfluxQL SELECT statements.
//!
//! ```
//! use influxql_builder::{select, mean, time, values};
//! use std::time::Duration;
//!
//! let mut query = select([mean("value")]);
//! query
//!     .from("cpu")
//!     .filter("region", values!["uswest"])
//!     .group_by(time(Duration::from_secs(600)))
//!     .fill(0);
//!
//! assert_eq!(
//!     query.build().unwrap(),
//!     r#"SELECT MEAN("value") FROM "cpu" WHERE "region" = 'uswest' GROUP BY time(10m) fill(0)"#
//! );
//! ```

pub mod config;
pub mod error;
pub mod expr;
pub mod fragment;
pub mod functions;
pub mod select;
pub mod template;
pub mod value;

pub use error::{BuildError, BuildResult};
pub use expr::{compile_condition, Condition, Keyword, AND, OR};
pub use fragment::{compile_fragment, Compile, Fragment, Function, Literal, TimeBucket};
pub use functions::*;
pub use select::{select, Fill, Order, SelectBuilder};
pub use value::{compile_value, Value};
