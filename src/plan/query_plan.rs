//! Plan representation and resolution

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::errors::{PlanError, PlanResult};

/// Prompt used when a clarify plan carries no question of its own
pub const DEFAULT_CLARIFY_QUESTION: &str = "Could you rephrase your question?";

/// A query plan exactly as it was received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryPlan {
    raw: Value,
}

/// One `{column, func}` entry of an aggregate plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationSpec {
    pub column: String,
    pub func: String,
}

/// A plan resolved to the fields its operation needs
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Count {
        filter: Option<String>,
    },
    Percentage {
        filter: Option<String>,
    },
    Aggregate {
        aggregations: Vec<AggregationSpec>,
        filter: Option<String>,
    },
    Compare {
        column: String,
        by: String,
    },
    Clarify {
        question: String,
    },
    /// Any `op` that is not recognized, normalized to lower case
    Unsupported(String),
}

impl Operation {
    /// Normalized operation name
    pub fn kind(&self) -> &str {
        match self {
            Operation::Count { .. } => "count",
            Operation::Percentage { .. } => "percentage",
            Operation::Aggregate { .. } => "aggregate",
            Operation::Compare { .. } => "compare",
            Operation::Clarify { .. } => "clarify",
            Operation::Unsupported(op) => op,
        }
    }
}

impl QueryPlan {
    /// Wraps any JSON value; non-object values resolve as unsupported
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Parses plan JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text).map(Self::from_value)
    }

    pub fn count(filter: Option<&str>) -> Self {
        let mut raw = Map::new();
        raw.insert("op".into(), json!("count"));
        if let Some(filter) = filter {
            raw.insert("filter".into(), json!(filter));
        }
        Self::from_value(Value::Object(raw))
    }

    pub fn percentage(filter: &str) -> Self {
        Self::from_value(json!({"op": "percentage", "filter": filter}))
    }

    /// Builds an aggregate plan from `(column, func)` pairs
    pub fn aggregate(aggregations: &[(&str, &str)], filter: Option<&str>) -> Self {
        let aggs: Vec<Value> = aggregations
            .iter()
            .map(|(column, func)| json!({"column": column, "func": func}))
            .collect();

        let mut raw = Map::new();
        raw.insert("op".into(), json!("aggregate"));
        raw.insert("aggregations".into(), Value::Array(aggs));
        if let Some(filter) = filter {
            raw.insert("filter".into(), json!(filter));
        }
        Self::from_value(Value::Object(raw))
    }

    pub fn compare(column: &str, by: &str) -> Self {
        Self::from_value(json!({"op": "compare", "column": column, "by": by}))
    }

    pub fn clarify(question: &str) -> Self {
        Self::from_value(json!({"op": "clarify", "question": question}))
    }

    /// Adds or replaces a top-level field
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.raw {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// The `op` field trimmed and lower-cased; empty when absent or not a string
    pub fn op(&self) -> String {
        self.raw
            .get("op")
            .and_then(Value::as_str)
            .map(|op| op.trim().to_lowercase())
            .unwrap_or_default()
    }

    /// Validates the fields required by this plan's op
    pub fn operation(&self) -> PlanResult<Operation> {
        let op = self.op();
        match op.as_str() {
            "count" => Ok(Operation::Count {
                filter: self.optional_str("filter")?,
            }),
            "percentage" => Ok(Operation::Percentage {
                filter: self.optional_str("filter")?,
            }),
            "aggregate" => Ok(Operation::Aggregate {
                aggregations: self.aggregations()?,
                filter: self.optional_str("filter")?,
            }),
            "compare" => {
                let column = self.optional_str("column")?.filter(|c| !c.trim().is_empty());
                let by = self.optional_str("by")?.filter(|b| !b.trim().is_empty());
                match (column, by) {
                    (Some(column), Some(by)) => Ok(Operation::Compare { column, by }),
                    _ => Err(PlanError::missing(
                        "Missing column specifications for comparison: 'column' and 'by' are required",
                    )),
                }
            }
            "clarify" => Ok(Operation::Clarify {
                question: self
                    .optional_str("question")?
                    .filter(|q| !q.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CLARIFY_QUESTION.to_string()),
            }),
            _ => Ok(Operation::Unsupported(op)),
        }
    }

    /// A string field; null counts as absent
    fn optional_str(&self, field: &str) -> PlanResult<Option<String>> {
        match self.raw.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(PlanError::wrong_type(field, "a string")),
        }
    }

    fn aggregations(&self) -> PlanResult<Vec<AggregationSpec>> {
        let entries = match self.raw.get("aggregations") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(_) => {
                return Err(PlanError::wrong_type(
                    "aggregations",
                    "a list of {column, func} objects",
                ))
            }
        };

        if entries.is_empty() {
            return Err(PlanError::missing(
                "Aggregate requires at least one {column, func} aggregation",
            ));
        }

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Ok(AggregationSpec {
                    column: entry_str(entry, index, "column")?,
                    func: entry_str(entry, index, "func")?,
                })
            })
            .collect()
    }
}

fn entry_str(entry: &Value, index: usize, key: &str) -> PlanResult<String> {
    match entry.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        None | Some(Value::Null) | Some(Value::String(_)) => Err(PlanError::missing(format!(
            "Aggregation {} is missing '{}'",
            index + 1,
            key
        ))),
        Some(_) => Err(PlanError::wrong_type(
            format!("aggregations[{}].{}", index, key),
            "a string",
        )),
    }
}
