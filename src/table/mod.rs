//! Tabular dataset subsystem for tableqa
//!
//! An uploaded dataset is materialized once per request into an immutable,
//! columnar [`Table`]. Everything downstream (filters, handlers, summaries)
//! reads it through borrowed [`TableView`]s and never mutates it.
//!
//! # Layout
//!
//! - `types`: columns, cells, and the table itself
//! - `view`: ordered row subsets over a borrowed table
//! - `loader`: CSV and SQLite ingestion
//! - `summary`: schema extraction for translators and clients

mod errors;
mod loader;
mod summary;
mod types;
mod view;

pub use errors::{LoadError, LoadResult, TableError, TableResult};
pub use loader::{load_csv, load_path, load_sqlite, DatasetMeta, FileType, LoadOptions, LoadedDataset};
pub use summary::{ColumnSummary, DatasetSummary};
pub use types::{CellValue, Column, ColumnData, ColumnType, Table};
pub use view::TableView;
