//! Filter expression errors
//!
//! Positions are byte offsets into the expression string.

use thiserror::Error;

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Reasons a filter expression cannot be compiled against a table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unterminated quote starting at position {position}")]
    UnterminatedQuote { position: usize },

    #[error("invalid number '{literal}' at position {position}")]
    InvalidNumber { literal: String, position: usize },

    #[error("unsupported operator '{operator}' at position {position}")]
    UnsupportedOperator { operator: String, position: usize },

    #[error("unexpected {found} at position {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: String,
        right: String,
    },

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

impl FilterError {
    /// Column name for unknown-column failures
    pub fn column(&self) -> Option<&str> {
        match self {
            FilterError::UnknownColumn(name) => Some(name),
            _ => None,
        }
    }
}
