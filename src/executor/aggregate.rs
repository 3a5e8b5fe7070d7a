//! `aggregate` operation

use crate::filter::{filter_rows, is_blank};
use crate::plan::AggregationSpec;
use crate::table::Table;

use super::errors::{ExecutorError, ExecutorResult};
use super::functions::AggFunc;
use super::result::{round2, Answer, Computed, Measures};

/// Evaluates every aggregation against one filtered view
pub(crate) fn aggregate(
    table: &Table,
    aggregations: &[AggregationSpec],
    filter: Option<&str>,
) -> ExecutorResult<Computed> {
    if aggregations.is_empty() {
        return Err(ExecutorError::missing_field(
            "Aggregate requires at least one {column, func} aggregation",
        ));
    }

    let view = filter_rows(table, filter)?;
    let mut measures = Measures::new();
    let mut clauses = Vec::with_capacity(aggregations.len());

    for spec in aggregations {
        let column = view
            .table()
            .column(&spec.column)
            .ok_or_else(|| ExecutorError::column_not_found(&spec.column))?;
        let func = AggFunc::parse(&spec.func)
            .ok_or_else(|| ExecutorError::unsupported_function(&spec.func))?;

        let value = round2(func.apply(&view, column)?);
        measures.insert(format!("{}_{}", spec.column, spec.func), value);
        clauses.push(format!("{} of {} = {:.2}", spec.func, spec.column, value));
    }

    let mut explanation = format!("Calculated {}", clauses.join("; "));
    if let Some(expr) = filter.filter(|_| !is_blank(filter)) {
        explanation.push_str(" where ");
        explanation.push_str(expr.trim());
    }

    Ok(Computed::new(Answer::Aggregates(measures), explanation))
}
