//! Aggregation functions

use std::collections::HashSet;

use crate::table::{Column, TableView};

use super::errors::{ExecutorError, ExecutorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Mean,
    Sum,
    Min,
    Max,
    Median,
    Count,
    Std,
    Var,
    NUnique,
}

impl AggFunc {
    /// Case-insensitive lookup, accepting `avg` and `average` for `mean`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mean" | "avg" | "average" => Some(AggFunc::Mean),
            "sum" => Some(AggFunc::Sum),
            "min" => Some(AggFunc::Min),
            "max" => Some(AggFunc::Max),
            "median" => Some(AggFunc::Median),
            "count" => Some(AggFunc::Count),
            "std" => Some(AggFunc::Std),
            "var" => Some(AggFunc::Var),
            "nunique" => Some(AggFunc::NUnique),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggFunc::Mean => "mean",
            AggFunc::Sum => "sum",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::Median => "median",
            AggFunc::Count => "count",
            AggFunc::Std => "std",
            AggFunc::Var => "var",
            AggFunc::NUnique => "nunique",
        }
    }

    /// `count` and `nunique` accept any column type
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, AggFunc::Count | AggFunc::NUnique)
    }

    /// Evaluates the function over the non-null cells of `column` in `view`
    pub fn apply<'t>(&self, view: &TableView<'t>, column: &'t Column) -> ExecutorResult<f64> {
        if self.requires_numeric() && !column.column_type().is_numeric_like() {
            return Err(ExecutorError::type_mismatch(format!(
                "cannot compute {} of {} column '{}'",
                self.as_str(),
                column.column_type(),
                column.name()
            )));
        }

        match self {
            AggFunc::Count => Ok(view.cells(column).filter(|c| !c.is_null()).count() as f64),
            AggFunc::NUnique => {
                let distinct: HashSet<String> = view
                    .cells(column)
                    .filter(|c| !c.is_null())
                    .map(|c| c.label())
                    .collect();
                Ok(distinct.len() as f64)
            }
            AggFunc::Sum => Ok(view.numbers(column).sum()),
            _ => {
                let values: Vec<f64> = view.numbers(column).collect();
                self.numeric(values, column.name())
            }
        }
    }

    fn numeric(&self, mut values: Vec<f64>, column: &str) -> ExecutorResult<f64> {
        let minimum = if matches!(self, AggFunc::Std | AggFunc::Var) { 2 } else { 1 };
        if values.len() < minimum {
            return Err(ExecutorError::empty_dataset(format!(
                "{} of '{}' needs at least {} non-null value{}, found {}",
                self.as_str(),
                column,
                minimum,
                if minimum == 1 { "" } else { "s" },
                values.len()
            )));
        }

        let n = values.len() as f64;
        let value = match self {
            AggFunc::Mean => values.iter().sum::<f64>() / n,
            AggFunc::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            AggFunc::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            AggFunc::Median => {
                values.sort_by(|a, b| a.total_cmp(b));
                let mid = values.len() / 2;
                if values.len() % 2 == 0 {
                    (values[mid - 1] + values[mid]) / 2.0
                } else {
                    values[mid]
                }
            }
            AggFunc::Var => sample_variance(&values),
            AggFunc::Std => sample_variance(&values).sqrt(),
            AggFunc::Sum | AggFunc::Count | AggFunc::NUnique => {
                return Err(ExecutorError::execution_failed(format!(
                    "{} is not a numeric reduction",
                    self.as_str()
                )))
            }
        };
        Ok(value)
    }
}

fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorErrorCode;
    use crate::table::Table;

    fn table() -> Table {
        Table::new(vec![
            Column::numeric("Age", [Some(22.0), Some(38.0), None, Some(26.0), Some(35.0)]),
            Column::text("Sex", [Some("male"), Some("female"), Some("female"), None, Some("male")]),
            Column::boolean("Alone", [Some(true), Some(false), Some(true), Some(true), None]),
        ])
        .unwrap()
    }

    fn apply(func: &str, column: &str) -> ExecutorResult<f64> {
        let table = table();
        let view = table.view();
        AggFunc::parse(func)
            .unwrap()
            .apply(&view, table.column(column).unwrap())
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(AggFunc::parse("AVG"), Some(AggFunc::Mean));
        assert_eq!(AggFunc::parse(" average "), Some(AggFunc::Mean));
        assert_eq!(AggFunc::parse("NUnique"), Some(AggFunc::NUnique));
        assert_eq!(AggFunc::parse("mode"), None);
    }

    #[test]
    fn test_numeric_reductions_skip_nulls() {
        assert_eq!(apply("mean", "Age").unwrap(), 30.25);
        assert_eq!(apply("sum", "Age").unwrap(), 121.0);
        assert_eq!(apply("min", "Age").unwrap(), 22.0);
        assert_eq!(apply("max", "Age").unwrap(), 38.0);
        assert_eq!(apply("median", "Age").unwrap(), 30.5);
        assert_eq!(apply("count", "Age").unwrap(), 4.0);
    }

    #[test]
    fn test_sample_statistics() {
        let var = apply("var", "Age").unwrap();
        assert!((var - 56.25).abs() < 1e-9);
        assert!((apply("std", "Age").unwrap() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_boolean_column_is_numeric() {
        assert_eq!(apply("mean", "Alone").unwrap(), 0.75);
        assert_eq!(apply("nunique", "Alone").unwrap(), 2.0);
    }

    #[test]
    fn test_text_column() {
        assert_eq!(apply("nunique", "Sex").unwrap(), 2.0);
        assert_eq!(apply("count", "Sex").unwrap(), 4.0);
        let err = apply("mean", "Sex").unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::QaTypeMismatch);
    }

    #[test]
    fn test_no_values() {
        let table = table();
        let view = table.view().retain(|row| row == 2);
        let age = table.column("Age").unwrap();

        assert_eq!(AggFunc::Sum.apply(&view, age).unwrap(), 0.0);
        assert_eq!(AggFunc::Count.apply(&view, age).unwrap(), 0.0);
        let err = AggFunc::Mean.apply(&view, age).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::QaEmptyDataset);

        let single = table.view().retain(|row| row == 0);
        assert_eq!(
            AggFunc::Std.apply(&single, age).unwrap_err().code(),
            ExecutorErrorCode::QaEmptyDataset
        );
    }
}
