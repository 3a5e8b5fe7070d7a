//! Dataset summaries
//!
//! A summary is the schema-level picture of a dataset that translators and
//! clients see: per-column type, cardinality, and missing counts, plus a
//! couple of sample rows.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use super::loader::DatasetMeta;
use super::types::{CellValue, Column, ColumnType, Table};

/// Numeric columns with fewer distinct values than this are categorical
const CATEGORICAL_THRESHOLD: usize = 10;

/// Number of leading rows included as samples
const SAMPLE_ROWS: usize = 2;

/// Per-column statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: ColumnType,
    pub is_numeric: bool,
    pub is_categorical: bool,
    pub unique_values: usize,
    pub missing_values: usize,
}

impl ColumnSummary {
    fn from_column(column: &Column, row_count: usize) -> Self {
        let mut distinct: HashSet<String> = HashSet::new();
        let mut missing = 0;

        for row in 0..row_count {
            match column.cell(row) {
                CellValue::Null => missing += 1,
                cell => {
                    distinct.insert(cell.label());
                }
            }
        }

        let dtype = column.column_type();
        let is_numeric = dtype == ColumnType::Numeric;
        let is_categorical = !is_numeric || distinct.len() < CATEGORICAL_THRESHOLD;

        Self {
            name: column.name().to_string(),
            dtype,
            is_numeric,
            is_categorical,
            unique_values: distinct.len(),
            missing_values: missing,
        }
    }
}

/// Schema-level description of a loaded dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub meta: DatasetMeta,
    pub columns: Vec<ColumnSummary>,
    pub sample_rows: Vec<Map<String, Value>>,
    pub n_rows: usize,
    pub column_names: Vec<String>,
}

impl DatasetSummary {
    /// Builds the summary of `table`
    pub fn build(table: &Table, meta: &DatasetMeta) -> Self {
        let row_count = table.row_count();

        let columns = table
            .columns()
            .iter()
            .map(|c| ColumnSummary::from_column(c, row_count))
            .collect();

        let sample_rows = (0..row_count.min(SAMPLE_ROWS))
            .map(|row| {
                table
                    .columns()
                    .iter()
                    .map(|c| (c.name().to_string(), c.cell(row).to_json()))
                    .collect()
            })
            .collect();

        Self {
            meta: meta.clone(),
            columns,
            sample_rows,
            n_rows: row_count,
            column_names: table.column_names().into_iter().map(str::to_string).collect(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric column names, longest first so no name is shadowed by its prefix
    pub fn numeric_columns(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.is_numeric)
            .map(|c| c.name.as_str())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names
    }
}
