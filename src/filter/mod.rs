//! Row filter expressions
//!
//! Filters arrive inside untrusted plans, so they are never evaluated as
//! general code. A closed grammar is tokenized, parsed, bound to the table's
//! columns, and only then evaluated:
//!
//! - comparisons `==, !=, <, <=, >, >=`
//! - conjunction `and` / `or` (and binds tighter), parentheses
//! - operands: column names (bare or backticked) and number, string, or
//!   boolean literals
//!
//! Literals are purely syntactic. Domain vocabulary (for example turning a
//! port name into its one-letter code) is resolved before a filter is built.

mod ast;
mod errors;
mod evaluator;
mod lexer;
mod parser;

pub use ast::{CompareOp, Expr, Literal, Operand};
pub use errors::{FilterError, FilterResult};
pub use evaluator::RowFilter;
pub use lexer::{tokenize, Spanned, Token};
pub use parser::{parse, MAX_DEPTH};

use crate::table::{Table, TableView};

/// Returns the rows of `table` matching `expression`
///
/// An absent or blank expression selects every row.
pub fn filter_rows<'t>(table: &'t Table, expression: Option<&str>) -> FilterResult<TableView<'t>> {
    match expression.map(str::trim) {
        None | Some("") => Ok(table.view()),
        Some(expr) => Ok(RowFilter::compile(expr, table)?.apply()),
    }
}

/// Returns true when `expression` is absent or blank
pub fn is_blank(expression: Option<&str>) -> bool {
    expression.map(|e| e.trim().is_empty()).unwrap_or(true)
}
