//! Binding and evaluating filter expressions against a table
//!
//! Binding resolves every column reference and type-checks each comparison
//! before any row is scanned. Evaluation is then infallible.

use crate::table::{CellValue, Column, ColumnType, Table, TableView};

use super::ast::{CompareOp, Expr, Literal, Operand};
use super::errors::{FilterError, FilterResult};
use super::parser::parse;

/// Comparison domain of an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    /// Numbers and booleans (as 0/1)
    Number,
    Text,
}

enum BoundOperand<'t> {
    Column(&'t Column),
    Literal(Literal),
}

impl<'t> BoundOperand<'t> {
    fn domain(&self) -> Domain {
        match self {
            BoundOperand::Column(c) => match c.column_type() {
                ColumnType::Text => Domain::Text,
                ColumnType::Numeric | ColumnType::Boolean => Domain::Number,
            },
            BoundOperand::Literal(Literal::Text(_)) => Domain::Text,
            BoundOperand::Literal(_) => Domain::Number,
        }
    }

    fn describe(&self) -> String {
        match self {
            BoundOperand::Column(c) => format!("{} column '{}'", c.column_type(), c.name()),
            BoundOperand::Literal(Literal::Text(s)) => format!("text literal '{}'", s),
            BoundOperand::Literal(Literal::Number(n)) => format!("numeric literal {}", n),
            BoundOperand::Literal(Literal::Bool(b)) => format!("boolean literal {}", b),
        }
    }

    fn cell<'s>(&'s self, row: usize) -> CellValue<'s>
    where
        't: 's,
    {
        match self {
            BoundOperand::Column(c) => c.cell(row),
            BoundOperand::Literal(Literal::Number(n)) => CellValue::Number(*n),
            BoundOperand::Literal(Literal::Text(s)) => CellValue::Text(s.as_str()),
            BoundOperand::Literal(Literal::Bool(b)) => CellValue::Bool(*b),
        }
    }
}

enum Bound<'t> {
    Compare {
        left: BoundOperand<'t>,
        op: CompareOp,
        right: BoundOperand<'t>,
    },
    /// Comparisons across domains: `!=` always holds, `==` never does
    Constant(bool),
    All(Vec<Bound<'t>>),
    Any(Vec<Bound<'t>>),
}

impl<'t> Bound<'t> {
    fn bind(expr: Expr, table: &'t Table) -> FilterResult<Self> {
        match expr {
            Expr::Compare { left, op, right } => {
                let left = bind_operand(left, table)?;
                let right = bind_operand(right, table)?;

                if left.domain() == right.domain() {
                    return Ok(Bound::Compare { left, op, right });
                }
                if op.is_ordering() {
                    return Err(FilterError::TypeMismatch {
                        op: op.as_str(),
                        left: left.describe(),
                        right: right.describe(),
                    });
                }
                Ok(Bound::Constant(op == CompareOp::Ne))
            }
            Expr::And(terms) => Ok(Bound::All(Self::bind_all(terms, table)?)),
            Expr::Or(terms) => Ok(Bound::Any(Self::bind_all(terms, table)?)),
        }
    }

    fn bind_all(terms: Vec<Expr>, table: &'t Table) -> FilterResult<Vec<Self>> {
        terms
            .into_iter()
            .map(|term| Self::bind(term, table))
            .collect()
    }

    fn eval(&self, row: usize) -> bool {
        match self {
            Bound::Compare { left, op, right } => compare(*op, left.cell(row), right.cell(row)),
            Bound::Constant(value) => *value,
            Bound::All(terms) => terms.iter().all(|term| term.eval(row)),
            Bound::Any(terms) => terms.iter().any(|term| term.eval(row)),
        }
    }
}

fn bind_operand(operand: Operand, table: &Table) -> FilterResult<BoundOperand<'_>> {
    match operand {
        Operand::Column(name) => table
            .column(&name)
            .map(BoundOperand::Column)
            .ok_or(FilterError::UnknownColumn(name)),
        Operand::Literal(lit) => Ok(BoundOperand::Literal(lit)),
    }
}

/// Compares two cells; a null on either side satisfies only `!=`
fn compare(op: CompareOp, left: CellValue<'_>, right: CellValue<'_>) -> bool {
    let ordering = match (left, right) {
        (CellValue::Null, _) | (_, CellValue::Null) => None,
        (CellValue::Text(a), CellValue::Text(b)) => Some(a.cmp(b)),
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    };
    op.holds(ordering)
}

/// A filter expression compiled against one table
pub struct RowFilter<'t> {
    table: &'t Table,
    root: Bound<'t>,
}

impl<'t> RowFilter<'t> {
    /// Parses `expression` and binds it to `table`
    pub fn compile(expression: &str, table: &'t Table) -> FilterResult<Self> {
        let expr = parse(expression)?;
        let root = Bound::bind(expr, table)?;
        Ok(Self { table, root })
    }

    /// Whether the row at `row` satisfies the expression
    pub fn matches(&self, row: usize) -> bool {
        self.root.eval(row)
    }

    /// Rows of the whole table that satisfy the expression
    pub fn apply(&self) -> TableView<'t> {
        self.table.view().retain(|row| self.matches(row))
    }
}
