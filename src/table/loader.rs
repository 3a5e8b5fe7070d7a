//! Dataset ingestion from CSV and SQLite files
//!
//! CSV schemas are inferred with arrow's CSV reader. SQLite files are read
//! through rusqlite: the first user table in catalog order is selected and
//! read up to a row limit.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};

use super::errors::{LoadError, LoadResult};
use super::types::{format_number, Column, ColumnData, Table};

/// Ingestion limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Maximum rows read from a SQLite table
    #[serde(default = "default_sqlite_row_limit")]
    pub sqlite_row_limit: usize,

    /// Rows sampled for CSV type inference (0 = every row)
    #[serde(default)]
    pub csv_infer_records: usize,
}

fn default_sqlite_row_limit() -> usize {
    5000
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sqlite_row_limit: default_sqlite_row_limit(),
            csv_infer_records: 0,
        }
    }
}

/// Source format of a loaded dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Sqlite,
}

impl FileType {
    /// Detects the format from a file name's extension (case-insensitive)
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(FileType::Csv),
            "db" | "sqlite" | "sqlite3" => Ok(FileType::Sqlite),
            _ => Err(LoadError::UnsupportedFileType(format!(".{}", ext))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Csv => "csv",
            FileType::Sqlite => "sqlite",
        }
    }
}

/// Provenance of a loaded table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetMeta {
    pub file_type: FileType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_table: Option<String>,
}

/// A table together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub table: Table,
    pub meta: DatasetMeta,
}

/// Loads a dataset, choosing the reader from the file extension
pub fn load_path(path: &Path, options: &LoadOptions) -> LoadResult<LoadedDataset> {
    let file_type = FileType::from_path(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);

    match file_type {
        FileType::Csv => {
            let reader = BufReader::new(File::open(path)?);
            let table = load_csv(reader, options)?;
            Ok(LoadedDataset {
                table,
                meta: DatasetMeta {
                    file_type,
                    filename,
                    tables: Vec::new(),
                    selected_table: None,
                },
            })
        }
        FileType::Sqlite => {
            let (table, tables, selected) = load_sqlite(path, options)?;
            Ok(LoadedDataset {
                table,
                meta: DatasetMeta {
                    file_type,
                    filename,
                    tables,
                    selected_table: Some(selected),
                },
            })
        }
    }
}

// ======================
// CSV
// ======================

/// Reads a headed CSV stream into a table
pub fn load_csv<R: Read + Seek>(mut reader: R, options: &LoadOptions) -> LoadResult<Table> {
    let format = Format::default().with_header(true);
    let max_records = match options.csv_infer_records {
        0 => None,
        n => Some(n),
    };

    let (schema, _) = format.infer_schema(&mut reader, max_records)?;
    if schema.fields().is_empty() {
        return Err(LoadError::NoColumns);
    }
    reader.rewind()?;

    let mut columns: Vec<ColumnData> = schema
        .fields()
        .iter()
        .map(|field| empty_column_for(field.data_type()))
        .collect();

    let csv = ReaderBuilder::new(Arc::new(schema.clone()))
        .with_format(format)
        .build(reader)?;

    for batch in csv {
        let batch = batch?;
        for (index, data) in columns.iter_mut().enumerate() {
            append_array(data, batch.column(index))?;
        }
    }

    let columns = schema
        .fields()
        .iter()
        .zip(columns)
        .map(|(field, data)| Column::new(field.name().clone(), data))
        .collect();

    Ok(Table::new(columns)?)
}

fn empty_column_for(data_type: &DataType) -> ColumnData {
    if data_type.is_numeric() {
        ColumnData::Numeric(Vec::new())
    } else if *data_type == DataType::Boolean {
        ColumnData::Boolean(Vec::new())
    } else {
        ColumnData::Text(Vec::new())
    }
}

fn append_array(data: &mut ColumnData, array: &ArrayRef) -> LoadResult<()> {
    match data {
        ColumnData::Numeric(values) => {
            let casted = cast(array, &DataType::Float64)?;
            let floats = downcast::<Float64Array>(&casted)?;
            values.extend(floats.iter());
        }
        ColumnData::Boolean(values) => {
            let bools = downcast::<BooleanArray>(array)?;
            values.extend(bools.iter());
        }
        ColumnData::Text(values) => {
            let casted = cast(array, &DataType::Utf8)?;
            let strings = downcast::<StringArray>(&casted)?;
            values.extend(strings.iter().map(|v| v.map(str::to_string)));
        }
    }
    Ok(())
}

fn downcast<T: Array + 'static>(array: &ArrayRef) -> LoadResult<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        LoadError::Csv(ArrowError::CastError(format!(
            "unexpected array type {}",
            array.data_type()
        )))
    })
}

// ======================
// SQLite
// ======================

enum SqlCell {
    Null,
    Number(f64),
    Text(String),
}

/// Reads the first user table of a SQLite file
///
/// Returns the table, every user table name, and the selected table name.
pub fn load_sqlite(path: &Path, options: &LoadOptions) -> LoadResult<(Table, Vec<String>, String)> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    let selected = tables.first().cloned().ok_or(LoadError::NoTables)?;

    let sql = format!(
        "SELECT * FROM {} LIMIT {}",
        quote_identifier(&selected),
        options.sqlite_row_limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

    let mut cells: Vec<Vec<SqlCell>> = names.iter().map(|_| Vec::new()).collect();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (index, column) in cells.iter_mut().enumerate() {
            let cell = match row.get_ref(index)? {
                ValueRef::Null => SqlCell::Null,
                ValueRef::Integer(i) => SqlCell::Number(i as f64),
                ValueRef::Real(f) => SqlCell::Number(f),
                ValueRef::Text(t) | ValueRef::Blob(t) => {
                    SqlCell::Text(String::from_utf8_lossy(t).into_owned())
                }
            };
            column.push(cell);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, column)| Column::new(name, sql_column_data(column)))
        .collect();

    Ok((Table::new(columns)?, tables, selected))
}

/// Columns holding only numbers (and nulls) stay numeric; anything else is text
fn sql_column_data(cells: Vec<SqlCell>) -> ColumnData {
    let all_numeric = cells
        .iter()
        .all(|c| matches!(c, SqlCell::Null | SqlCell::Number(_)));

    if all_numeric {
        ColumnData::Numeric(
            cells
                .into_iter()
                .map(|c| match c {
                    SqlCell::Number(n) => Some(n),
                    _ => None,
                })
                .collect(),
        )
    } else {
        ColumnData::Text(
            cells
                .into_iter()
                .map(|c| match c {
                    SqlCell::Null => None,
                    SqlCell::Number(n) => Some(format_number(n)),
                    SqlCell::Text(s) => Some(s),
                })
                .collect(),
        )
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellValue, ColumnType};
    use std::io::Cursor;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_path(Path::new("a.CSV")).unwrap(), FileType::Csv);
        assert_eq!(FileType::from_path(Path::new("a.db")).unwrap(), FileType::Sqlite);
        assert_eq!(
            FileType::from_path(Path::new("a.sqlite")).unwrap(),
            FileType::Sqlite
        );
        assert!(matches!(
            FileType::from_path(Path::new("a.xlsx")),
            Err(LoadError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_csv_type_inference() {
        let data = "Survived,Sex,Age,Alone\n1,female,38,true\n0,male,,false\n";
        let table = load_csv(Cursor::new(data), &LoadOptions::default()).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("Survived").unwrap().column_type(), ColumnType::Numeric);
        assert_eq!(table.column("Sex").unwrap().column_type(), ColumnType::Text);
        assert_eq!(table.column("Alone").unwrap().column_type(), ColumnType::Boolean);

        let age = table.column("Age").unwrap();
        assert_eq!(age.cell(0), CellValue::Number(38.0));
        assert!(age.cell(1).is_null());
    }

    #[test]
    fn test_csv_mixed_column_is_text() {
        let data = "Ticket\n113803\nPC 17599\n";
        let table = load_csv(Cursor::new(data), &LoadOptions::default()).unwrap();
        let ticket = table.column("Ticket").unwrap();
        assert_eq!(ticket.column_type(), ColumnType::Text);
        assert_eq!(ticket.cell(1), CellValue::Text("PC 17599"));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("people"), "\"people\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
