//! Table construction and dataset loading errors

use thiserror::Error;

/// Result type for table construction
pub type TableResult<T> = Result<T, TableError>;

/// Result type for dataset loading
pub type LoadResult<T> = Result<T, LoadError>;

/// Structural errors raised while assembling a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two columns share a name
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Column lengths disagree
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised while reading an uploaded file into a table
#[derive(Debug, Error)]
pub enum LoadError {
    /// Extension is neither CSV nor SQLite
    #[error("Unsupported file type '{0}'. Please upload CSV or SQLite (.db/.sqlite)")]
    UnsupportedFileType(String),

    /// SQLite file holds no user tables
    #[error("No user tables found in SQLite file")]
    NoTables,

    /// CSV has no header or no columns
    #[error("CSV file has no columns")]
    NoColumns,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] arrow::error::ArrowError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Table(#[from] TableError),
}

impl LoadError {
    /// Whether the failure is caused by the uploaded content rather than the host
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LoadError::Io(_))
    }
}
