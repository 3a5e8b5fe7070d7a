//! Question to plan translation
//!
//! A translator turns a natural-language question into a [`QueryPlan`] using
//! only the dataset summary. Translation never fails: a question it cannot
//! map resolves to a `clarify` plan.
//!
//! [`RuleTranslator`] is the shipped implementation. Model-backed translators
//! plug in behind [`PlanTranslator`] and can use
//! [`crate::plan::extract_plan`] to recover a plan from free-form output.

mod rules;

pub use rules::{RuleTranslator, FALLBACK_QUESTION};

use crate::plan::QueryPlan;
use crate::table::DatasetSummary;

/// Derives a plan for `question` against a dataset described by `summary`
pub trait PlanTranslator: Send + Sync {
    fn translate(&self, question: &str, summary: &DatasetSummary) -> QueryPlan;
}
