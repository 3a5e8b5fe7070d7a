//! Plan resolution errors

use thiserror::Error;

/// Result type for plan resolution
pub type PlanResult<T> = Result<T, PlanError>;

/// A field the operation needs is absent or has the wrong JSON type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("{0}")]
    Missing(String),

    #[error("Field '{field}' must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

impl PlanError {
    pub fn missing(message: impl Into<String>) -> Self {
        PlanError::Missing(message.into())
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        PlanError::WrongType {
            field: field.into(),
            expected,
        }
    }
}
