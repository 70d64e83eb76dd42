//! Errors raised while compiling fragments into InfluxQL text.

use thiserror::Error;

/// Every way a fragment can fail to compile.
///
/// All of these are local validation failures. The first one raised anywhere
/// in a fragment tree aborts the whole statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A function call was built with an empty name
    #[error("missing function name")]
    MissingFunctionName,

    /// Explicit `?` placeholders do not line up with the bound values
    #[error("mismatched number of placeholders ({placeholders}) and values ({values})")]
    PlaceholderCountMismatch { placeholders: usize, values: usize },

    /// Shorthand condition (`field` or `field op`) needs exactly one value
    #[error("expecting exactly one value for {expr:?}, got {values}")]
    ShorthandValueCountMismatch { expr: String, values: usize },

    /// Shorthand condition with three or more tokens
    #[error("unsupported expression {0:?}")]
    UnsupportedShorthandExpression(String),

    /// Shorthand condition that is empty once whitespace is removed
    #[error("expecting statement")]
    MissingStatement,
}

pub type BuildResult<T> = Result<T, BuildError>;
