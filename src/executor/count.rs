//! `count` operation

use crate::filter::{filter_rows, is_blank};
use crate::table::Table;

use super::errors::ExecutorResult;
use super::result::{Answer, Computed};

/// Counts the rows matching `filter`, or all rows without one
pub(crate) fn count(table: &Table, filter: Option<&str>) -> ExecutorResult<Computed> {
    let view = filter_rows(table, filter)?;
    let matched = view.len() as u64;

    let explanation = match filter {
        Some(expr) if !is_blank(filter) => format!("Count of records matching: {}", expr.trim()),
        _ => "Total number of records".to_string(),
    };

    Ok(Computed::new(Answer::Count(matched), explanation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorErrorCode;
    use crate::table::Column;

    fn classes() -> Table {
        Table::new(vec![Column::numeric("Pclass", [Some(1.0), Some(2.0), Some(1.0)])]).unwrap()
    }

    #[test]
    fn test_count_with_filter() {
        let out = count(&classes(), Some("Pclass == 1")).unwrap();
        assert_eq!(out.answer, Answer::Count(2));
        assert_eq!(out.explanation, "Count of records matching: Pclass == 1");
    }

    #[test]
    fn test_count_without_filter() {
        let out = count(&classes(), Some("  ")).unwrap();
        assert_eq!(out.answer, Answer::Count(3));
        assert_eq!(out.explanation, "Total number of records");
    }

    #[test]
    fn test_count_bad_filter() {
        let err = count(&classes(), Some("Pclass = 1")).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::QaFilterInvalid);
    }
}
