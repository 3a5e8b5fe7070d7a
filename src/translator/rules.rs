//! Keyword rules for passenger-manifest style datasets

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::plan::QueryPlan;
use crate::table::DatasetSummary;

use super::PlanTranslator;

/// Prompt returned when no rule matches
pub const FALLBACK_QUESTION: &str = "Could you rephrase your question? Try asking about passenger survival rates, ages, or class distribution.";

/// Port of embarkation names and their one-letter codes
const PORTS: &[(&str, &str)] = &[
    ("southampton", "S"),
    ("cherbourg", "C"),
    ("queenstown", "Q"),
];

static STATISTIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(average|mean|median|maximum|max|highest|minimum|min|lowest|total|sum)\b")
        .expect("statistic pattern is valid")
});

static ROW_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bhow many (rows|records|entries|passengers|people)\b")
        .expect("row count pattern is valid")
});

type Rule = fn(&str, &DatasetSummary) -> Option<QueryPlan>;

/// Ordered rules; the first that yields a plan wins
const RULES: &[Rule] = &[
    survival_by_sex,
    embarkation_port,
    survival_rate_by_class,
    survival_rate,
    average_age,
    females_in_first_class,
    first_class,
    female_share,
    column_statistic,
    row_count,
];

/// Translator backed by fixed keyword rules
///
/// A rule fires only when every column it references exists in the summary.
#[derive(Debug, Clone)]
pub struct RuleTranslator {
    fallback: String,
}

impl RuleTranslator {
    pub fn new() -> Self {
        Self {
            fallback: FALLBACK_QUESTION.to_string(),
        }
    }
}

impl Default for RuleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanTranslator for RuleTranslator {
    fn translate(&self, question: &str, summary: &DatasetSummary) -> QueryPlan {
        let q = question.trim().to_lowercase();
        RULES
            .iter()
            .find_map(|rule| rule(&q, summary))
            .unwrap_or_else(|| QueryPlan::clarify(&self.fallback))
    }
}

fn mentions(q: &str, words: &[&str]) -> bool {
    words.iter().any(|w| q.contains(w))
}

fn has_columns(summary: &DatasetSummary, columns: &[&str]) -> bool {
    columns.iter().all(|c| summary.has_column(c))
}

fn about_survival(q: &str) -> bool {
    mentions(q, &["survived", "survival", "survive", "survivor"])
}

fn about_rate(q: &str) -> bool {
    mentions(q, &["percentage", "percent", "rate", "proportion"])
}

fn about_gender(q: &str) -> bool {
    mentions(q, &["gender", "sex"])
}

fn about_first_class(q: &str) -> bool {
    mentions(q, &["first class", "1st class", "class 1"])
}

fn about_women(q: &str) -> bool {
    mentions(q, &["female", "women", "woman"])
}

fn survival_by_sex(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    if about_gender(q) && about_survival(q) && has_columns(summary, &["Survived", "Sex"]) {
        return Some(
            QueryPlan::compare("Survived", "Sex")
                .with_field("description", json!("survival rate by gender")),
        );
    }
    None
}

fn embarkation_port(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    if !has_columns(summary, &["Embarked"]) {
        return None;
    }
    PORTS
        .iter()
        .find(|(name, _)| q.contains(name))
        .map(|(_, code)| {
            let filter = format!("Embarked == '{}'", code);
            QueryPlan::count(Some(filter.as_str()))
        })
}

fn survival_rate_by_class(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    if about_survival(q)
        && about_rate(q)
        && q.contains("class")
        && has_columns(summary, &["Survived", "Pclass"])
    {
        return Some(QueryPlan::compare("Survived", "Pclass"));
    }
    None
}

fn survival_rate(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    if about_survival(q) && about_rate(q) && has_columns(summary, &["Survived"]) {
        return Some(QueryPlan::percentage("Survived == 1"));
    }
    None
}

fn average_age(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    if !mentions(q, &["average age", "mean age"]) || !has_columns(summary, &["Age"]) {
        return None;
    }
    let filter = if about_survival(q) && has_columns(summary, &["Survived"]) {
        Some("Survived == 1")
    } else {
        None
    };
    Some(QueryPlan::aggregate(&[("Age", "mean")], filter))
}

fn females_in_first_class(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    if about_women(q) && about_first_class(q) && has_columns(summary, &["Sex", "Pclass"]) {
        return Some(QueryPlan::count(Some("Sex == 'female' and Pclass == 1")));
    }
    None
}

fn first_class(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    if about_first_class(q) && has_columns(summary, &["Pclass"]) {
        return Some(QueryPlan::count(Some("Pclass == 1")));
    }
    None
}

fn female_share(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    if about_women(q) && has_columns(summary, &["Sex"]) {
        return Some(QueryPlan::percentage("Sex == 'female'"));
    }
    None
}

/// A statistic word together with a numeric column named in the question
fn column_statistic(q: &str, summary: &DatasetSummary) -> Option<QueryPlan> {
    let word = STATISTIC_RE.captures(q)?.get(1)?.as_str();
    let func = match word {
        "average" | "mean" => "mean",
        "median" => "median",
        "maximum" | "max" | "highest" => "max",
        "minimum" | "min" | "lowest" => "min",
        _ => "sum",
    };

    let column = summary
        .numeric_columns()
        .into_iter()
        .find(|name| names_column(q, name))?;

    Some(QueryPlan::aggregate(&[(column, func)], None))
}

fn row_count(q: &str, _summary: &DatasetSummary) -> Option<QueryPlan> {
    if ROW_COUNT_RE.is_match(q) {
        return Some(QueryPlan::count(None));
    }
    None
}

/// Whole-word, case-insensitive match of a column name in the question
fn names_column(q: &str, column: &str) -> bool {
    Regex::new(&format!(r"\b{}\b", regex::escape(&column.to_lowercase())))
        .map(|re| re.is_match(q))
        .unwrap_or(false)
}
