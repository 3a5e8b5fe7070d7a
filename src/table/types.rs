//! Columnar table representation
//!
//! Columns are typed vectors of optional values. A table is assembled once and
//! then only read.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::errors::{TableError, TableResult};
use super::view::TableView;

/// Declared element type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
    Boolean,
}

impl ColumnType {
    /// Returns the type name used in summaries and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
        }
    }

    /// Numeric and boolean columns can be averaged and summed
    pub fn is_numeric_like(&self) -> bool {
        matches!(self, ColumnType::Numeric | ColumnType::Boolean)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A borrowed view of a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Null,
    Number(f64),
    Text(&'a str),
    Bool(bool),
}

impl<'a> CellValue<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric reading of the cell; booleans read as 0/1
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Renders the cell as a group label or sample value
    pub fn label(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => (*s).to_string(),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
        }
    }

    /// Converts the cell to JSON; nulls become `""` as in dataset samples
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::String(String::new()),
            CellValue::Number(n) => number_to_json(*n),
            CellValue::Text(s) => Value::String((*s).to_string()),
            CellValue::Bool(b) => Value::Bool(*b),
        }
    }
}

/// Formats a float without a trailing `.0` when it is integral
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Typed column storage
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Boolean(_) => ColumnType::Boolean,
        }
    }

    /// Returns the cell at `row`; out-of-range rows read as null
    pub fn cell(&self, row: usize) -> CellValue<'_> {
        match self {
            ColumnData::Numeric(v) => match v.get(row) {
                Some(Some(n)) => CellValue::Number(*n),
                _ => CellValue::Null,
            },
            ColumnData::Text(v) => match v.get(row) {
                Some(Some(s)) => CellValue::Text(s.as_str()),
                _ => CellValue::Null,
            },
            ColumnData::Boolean(v) => match v.get(row) {
                Some(Some(b)) => CellValue::Bool(*b),
                _ => CellValue::Null,
            },
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Creates a numeric column
    pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values.into_iter().collect()))
    }

    /// Creates a text column
    pub fn text<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    /// Creates a boolean column
    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values.into_iter().collect()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn cell(&self, row: usize) -> CellValue<'_> {
        self.data.cell(row)
    }
}

/// An immutable, in-memory columnar dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Assembles a table, rejecting duplicate names and ragged columns
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != row_count {
                return Err(TableError::RaggedColumns {
                    column: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Exact, case-sensitive column lookup
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// A view over every row, in order
    pub fn view(&self) -> TableView<'_> {
        TableView::new(self, (0..self.row_count).collect())
    }
}
