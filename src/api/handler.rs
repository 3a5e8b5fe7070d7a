//! Ask handler

use std::sync::Arc;

use crate::executor::execute;
use crate::observability::{log_event_with_fields, Event};
use crate::table::{DatasetSummary, LoadedDataset};
use crate::translator::{PlanTranslator, RuleTranslator};

use super::response::AskResponse;

/// Answers questions with a shared translator
///
/// Holds no per-request state; one handler serves concurrent requests.
#[derive(Clone)]
pub struct AskHandler {
    translator: Arc<dyn PlanTranslator>,
}

impl AskHandler {
    pub fn new(translator: Arc<dyn PlanTranslator>) -> Self {
        Self { translator }
    }

    /// Handler backed by [`RuleTranslator`]
    pub fn with_rules() -> Self {
        Self::new(Arc::new(RuleTranslator::new()))
    }

    /// Translates `question` and executes the resulting plan
    pub fn answer(&self, question: &str, dataset: &LoadedDataset) -> AskResponse {
        let question = question.trim();
        let summary = DatasetSummary::build(&dataset.table, &dataset.meta);

        let plan = self.translator.translate(question, &summary);
        log_event_with_fields(Event::PlanTranslated, &[("op", plan.op().as_str())]);

        let envelope = execute(&plan, &dataset.table);
        AskResponse::new(question, envelope, dataset)
    }
}

impl Default for AskHandler {
    fn default() -> Self {
        Self::with_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Answer;
    use crate::plan::QueryPlan;
    use crate::table::{Column, DatasetMeta, FileType, Table};

    fn dataset() -> LoadedDataset {
        LoadedDataset {
            table: Table::new(vec![
                Column::numeric("Survived", [Some(0.0), Some(1.0), Some(1.0), Some(1.0)]),
                Column::text("Sex", [Some("male"), Some("male"), Some("female"), Some("female")]),
            ])
            .unwrap(),
            meta: DatasetMeta {
                file_type: FileType::Csv,
                filename: Some("titanic.csv".into()),
                tables: Vec::new(),
                selected_table: None,
            },
        }
    }

    struct Fixed(QueryPlan);

    impl PlanTranslator for Fixed {
        fn translate(&self, _question: &str, _summary: &DatasetSummary) -> QueryPlan {
            self.0.clone()
        }
    }

    #[test]
    fn test_rule_backed_answer() {
        let response = AskHandler::with_rules().answer(" Survival rate by sex? ", &dataset());
        assert_eq!(response.question, "Survival rate by sex?");
        assert_eq!(response.analysis_type, "compare");
        assert_eq!(response.dataset_info.rows, 4);
        assert_eq!(response.dataset_info.columns, 2);
        match response.answer {
            Some(Answer::Rates(rates)) => assert_eq!(rates.get("male"), Some(50.0)),
            other => panic!("unexpected answer {:?}", other),
        }
    }

    #[test]
    fn test_custom_translator() {
        let handler = AskHandler::new(Arc::new(Fixed(QueryPlan::count(Some("Sex == 'female'")))));
        let response = handler.answer("anything", &dataset());
        assert_eq!(response.answer, Some(Answer::Count(2)));
        assert_eq!(response.analysis_type, "count");
    }

    #[test]
    fn test_unknown_op_reported() {
        let handler = AskHandler::new(Arc::new(Fixed(QueryPlan::from_value(serde_json::json!({})))));
        let response = handler.answer("anything", &dataset());
        assert!(response.answer.is_none());
        assert_eq!(response.analysis_type, "unknown");
    }
}
