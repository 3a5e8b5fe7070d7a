//! Row subsets over a borrowed table

use super::types::{CellValue, Column, Table};

/// An ordered subsequence of a table's rows
///
/// Views hold row indices only; cells are always read from the source table.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a Table,
    rows: Vec<usize>,
}

impl<'a> TableView<'a> {
    pub(crate) fn new(table: &'a Table, rows: Vec<usize>) -> Self {
        Self { table, rows }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Row indices into the source table, in table order
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps only the rows for which `keep` returns true
    pub fn retain<F: FnMut(usize) -> bool>(mut self, mut keep: F) -> Self {
        self.rows.retain(|&row| keep(row));
        self
    }

    /// Cells of `column` restricted to this view
    pub fn cells<'c>(&'c self, column: &'a Column) -> impl Iterator<Item = CellValue<'a>> + 'c {
        self.rows.iter().map(move |&row| column.cell(row))
    }

    /// Non-null numeric readings of `column` restricted to this view
    pub fn numbers<'c>(&'c self, column: &'a Column) -> impl Iterator<Item = f64> + 'c {
        self.cells(column).filter_map(|cell| cell.as_number())
    }
}
