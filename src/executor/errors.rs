//! Executor error types
//!
//! Error codes:
//! - QA_FILTER_INVALID
//! - QA_COLUMN_NOT_FOUND
//! - QA_UNSUPPORTED_FUNCTION
//! - QA_TYPE_MISMATCH
//! - QA_MISSING_FIELD
//! - QA_EMPTY_DATASET
//! - QA_EXECUTION_FAILED
//!
//! Every executor error is recovered into an envelope by the dispatcher; none
//! is fatal.

use std::fmt;

use crate::filter::FilterError;
use crate::plan::PlanError;

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Filter failed to parse, bind, or type-check
    QaFilterInvalid,
    /// Plan names a column the table does not have
    QaColumnNotFound,
    /// Aggregation function outside the supported set
    QaUnsupportedFunction,
    /// Numeric operation on a text column
    QaTypeMismatch,
    /// Field required by the op is absent or has the wrong type
    QaMissingField,
    /// Not enough rows or values to compute the answer
    QaEmptyDataset,
    /// Anything else, including panics caught at the dispatcher
    QaExecutionFailed,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::QaFilterInvalid => "QA_FILTER_INVALID",
            ExecutorErrorCode::QaColumnNotFound => "QA_COLUMN_NOT_FOUND",
            ExecutorErrorCode::QaUnsupportedFunction => "QA_UNSUPPORTED_FUNCTION",
            ExecutorErrorCode::QaTypeMismatch => "QA_TYPE_MISMATCH",
            ExecutorErrorCode::QaMissingField => "QA_MISSING_FIELD",
            ExecutorErrorCode::QaEmptyDataset => "QA_EMPTY_DATASET",
            ExecutorErrorCode::QaExecutionFailed => "QA_EXECUTION_FAILED",
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error with code and human-readable message
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
}

impl ExecutorError {
    fn new(code: ExecutorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn filter_invalid(reason: impl Into<String>) -> Self {
        Self::new(ExecutorErrorCode::QaFilterInvalid, reason)
    }

    pub fn column_not_found(column: &str) -> Self {
        Self::new(
            ExecutorErrorCode::QaColumnNotFound,
            format!("Column '{}' not found", column),
        )
    }

    pub fn unsupported_function(func: &str) -> Self {
        Self::new(
            ExecutorErrorCode::QaUnsupportedFunction,
            format!("Unsupported aggregation function '{}'", func),
        )
    }

    pub fn type_mismatch(reason: impl Into<String>) -> Self {
        Self::new(ExecutorErrorCode::QaTypeMismatch, reason)
    }

    pub fn missing_field(reason: impl Into<String>) -> Self {
        Self::new(ExecutorErrorCode::QaMissingField, reason)
    }

    pub fn empty_dataset(reason: impl Into<String>) -> Self {
        Self::new(ExecutorErrorCode::QaEmptyDataset, reason)
    }

    pub fn execution_failed(reason: impl Into<String>) -> Self {
        Self::new(ExecutorErrorCode::QaExecutionFailed, reason)
    }

    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Message without the code, as shown in explanations
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ExecutorError {}

impl From<FilterError> for ExecutorError {
    fn from(err: FilterError) -> Self {
        ExecutorError::filter_invalid(format!("invalid filter: {}", err))
    }
}

impl From<PlanError> for ExecutorError {
    fn from(err: PlanError) -> Self {
        ExecutorError::missing_field(err.to_string())
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
