//! Plan dispatch
//!
//! Routes a plan to its handler and converts every failure, including a
//! handler panic, into an envelope with no answer.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::observability::{log_event_with_fields, Event};
use crate::plan::{Operation, QueryPlan};
use crate::table::Table;

use super::aggregate::aggregate;
use super::compare::compare;
use super::count::count;
use super::errors::{ExecutorError, ExecutorResult};
use super::percentage::percentage;
use super::result::{Computed, ResultEnvelope};

/// Executes `plan` against `table`
///
/// Never fails: errors are reported through the envelope's explanation.
pub fn execute(plan: &QueryPlan, table: &Table) -> ResultEnvelope {
    execute_with(plan, table, run)
}

type Handler = fn(&Operation, &Table) -> ExecutorResult<Computed>;

fn execute_with(plan: &QueryPlan, table: &Table, handler: Handler) -> ResultEnvelope {
    let op = plan.op();

    let operation = match plan.operation() {
        Ok(operation) => operation,
        Err(err) => return failed(plan, &op, ExecutorError::from(err)),
    };

    match &operation {
        Operation::Clarify { question } => {
            log_event_with_fields(Event::PlanClarify, &[("op", "clarify")]);
            return ResultEnvelope::unanswered(question.clone(), plan);
        }
        Operation::Unsupported(_) => {
            log_event_with_fields(Event::PlanUnsupported, &[("op", op.as_str())]);
            return ResultEnvelope::unanswered(format!("Unsupported operation: {}", op), plan);
        }
        _ => {}
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&operation, table)));

    match outcome {
        Ok(Ok(computed)) => {
            let rows = table.row_count().to_string();
            log_event_with_fields(
                Event::PlanExecuted,
                &[("op", op.as_str()), ("rows", rows.as_str())],
            );
            ResultEnvelope::answered(computed.answer, computed.explanation, plan)
        }
        Ok(Err(err)) => failed(plan, &op, err),
        Err(payload) => {
            let err = ExecutorError::execution_failed(panic_message(payload.as_ref()));
            log_event_with_fields(
                Event::PlanPanicked,
                &[("op", op.as_str()), ("code", err.code().code()), ("reason", err.message())],
            );
            ResultEnvelope::unanswered(format!("Error executing plan: {}", err.message()), plan)
        }
    }
}

/// Executes plan JSON text; unparseable text yields an envelope, not an error
pub fn execute_json(text: &str, table: &Table) -> ResultEnvelope {
    match QueryPlan::from_json(text) {
        Ok(plan) => execute(&plan, table),
        Err(err) => {
            let plan = QueryPlan::from_value(serde_json::Value::String(text.to_string()));
            let err = ExecutorError::execution_failed(format!("plan is not valid JSON: {}", err));
            log_event_with_fields(
                Event::PlanFailed,
                &[("code", err.code().code()), ("reason", err.message())],
            );
            ResultEnvelope::unanswered(format!("Error executing plan: {}", err.message()), &plan)
        }
    }
}

fn run(operation: &Operation, table: &Table) -> ExecutorResult<Computed> {
    match operation {
        Operation::Count { filter } => count(table, filter.as_deref()),
        Operation::Percentage { filter } => percentage(table, filter.as_deref()),
        Operation::Aggregate {
            aggregations,
            filter,
        } => aggregate(table, aggregations, filter.as_deref()),
        Operation::Compare { column, by } => compare(table, column, by),
        Operation::Clarify { .. } | Operation::Unsupported(_) => Err(
            ExecutorError::execution_failed(format!("'{}' does not execute", operation.kind())),
        ),
    }
}

fn failed(plan: &QueryPlan, op: &str, err: ExecutorError) -> ResultEnvelope {
    log_event_with_fields(
        Event::PlanFailed,
        &[("op", op), ("code", err.code().code()), ("reason", err.message())],
    );
    ResultEnvelope::unanswered(format!("{}: {}", error_prefix(op), err.message()), plan)
}

fn error_prefix(op: &str) -> &'static str {
    match op {
        "count" => "Error in count operation",
        "percentage" => "Error calculating percentage",
        "aggregate" => "Error in aggregation",
        "compare" => "Error in comparison",
        _ => "Error executing plan",
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
