//! `percentage` operation

use crate::filter::{filter_rows, is_blank};
use crate::table::Table;

use super::errors::{ExecutorError, ExecutorResult};
use super::result::{round2, Answer, Computed};

/// Share of rows matching `filter`, as a percentage of all rows
pub(crate) fn percentage(table: &Table, filter: Option<&str>) -> ExecutorResult<Computed> {
    let expr = match filter {
        Some(expr) if !is_blank(filter) => expr.trim(),
        _ => return Err(ExecutorError::missing_field("percentage requires a 'filter'")),
    };

    if table.is_empty() {
        return Err(ExecutorError::empty_dataset("dataset is empty"));
    }

    let matched = filter_rows(table, Some(expr))?.len();
    let pct = round2(matched as f64 / table.row_count() as f64 * 100.0);

    Ok(Computed::new(
        Answer::Percentage(pct),
        format!("Percentage of records matching {}: {}%", expr, pct),
    ))
}
