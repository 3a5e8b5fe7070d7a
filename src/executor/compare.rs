//! `compare` operation: per-group rate of a value column

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::table::{CellValue, Table};

use super::errors::{ExecutorError, ExecutorResult};
use super::result::{round2, Answer, Computed, Measures};

/// Distinct non-null value of the grouping column
#[derive(Debug, Clone, Copy)]
enum GroupKey<'a> {
    Number(f64),
    Text(&'a str),
    Bool(bool),
}

impl<'a> GroupKey<'a> {
    fn from_cell(cell: CellValue<'a>) -> Option<Self> {
        match cell {
            CellValue::Null => None,
            // -0.0 and 0.0 label alike, so they share a group
            CellValue::Number(n) if n == 0.0 => Some(GroupKey::Number(0.0)),
            CellValue::Number(n) => Some(GroupKey::Number(n)),
            CellValue::Text(s) => Some(GroupKey::Text(s)),
            CellValue::Bool(b) => Some(GroupKey::Bool(b)),
        }
    }

    fn label(&self) -> String {
        match *self {
            GroupKey::Number(n) => CellValue::Number(n).label(),
            GroupKey::Text(s) => s.to_string(),
            GroupKey::Bool(b) => CellValue::Bool(b).label(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            GroupKey::Bool(_) => 0,
            GroupKey::Number(_) => 1,
            GroupKey::Text(_) => 2,
        }
    }
}

impl Ord for GroupKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            (GroupKey::Bool(a), GroupKey::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey<'_> {}

#[derive(Default)]
struct Tally {
    sum: f64,
    n: usize,
}

/// Groups by `by` and reports `mean(column) * 100` per group
pub(crate) fn compare(table: &Table, column: &str, by: &str) -> ExecutorResult<Computed> {
    let values = table
        .column(column)
        .ok_or_else(|| ExecutorError::column_not_found(column))?;
    let groups = table
        .column(by)
        .ok_or_else(|| ExecutorError::column_not_found(by))?;

    if !values.column_type().is_numeric_like() {
        return Err(ExecutorError::type_mismatch(format!(
            "cannot compute rates of {} column '{}'",
            values.column_type(),
            column
        )));
    }

    let mut tallies: BTreeMap<GroupKey<'_>, Tally> = BTreeMap::new();
    let mut binary = true;

    for row in 0..table.row_count() {
        let Some(key) = GroupKey::from_cell(groups.cell(row)) else {
            continue;
        };
        let tally = tallies.entry(key).or_default();
        if let Some(v) = values.cell(row).as_number() {
            binary &= v == 0.0 || v == 1.0;
            tally.sum += v;
            tally.n += 1;
        }
    }

    let mut rates = Measures::new();
    let mut lines = Vec::with_capacity(tallies.len());
    let mut highest: Option<(String, f64)> = None;

    for (key, tally) in &tallies {
        let label = key.label();
        if tally.n == 0 {
            lines.push(format!("{}: n/a", label));
            continue;
        }
        let rate = round2(tally.sum / tally.n as f64 * 100.0);
        lines.push(format!("{}: {:.2}%", label, rate));
        if highest.as_ref().map_or(true, |(_, best)| rate > *best) {
            highest = Some((label.clone(), rate));
        }
        rates.insert(label, rate);
    }

    let mut explanation = format!("Comparison of {} by {}:", column, by);
    for line in &lines {
        explanation.push('\n');
        explanation.push_str(line);
    }
    match &highest {
        Some((label, rate)) => {
            explanation.push_str(&format!("\nHighest: {} ({:.2}%)", label, rate));
        }
        None => explanation.push_str("\nNo groups with values to compare"),
    }
    if !binary {
        explanation.push_str(&format!(
            "\nNote: {} is not 0/1-coded; figures are its average value scaled to a percentage",
            column
        ));
    }

    Ok(Computed::new(Answer::Rates(rates), explanation))
}
