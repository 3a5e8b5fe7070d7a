//! Result envelope returned for every plan

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::plan::QueryPlan;

/// Ordered label → value mapping
///
/// Serializes as a JSON object in insertion order. Inserting an existing key
/// keeps its position and replaces the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measures {
    entries: Vec<(String, f64)>,
}

impl Measures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for Measures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The computed answer of a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Count(u64),
    Percentage(f64),
    /// `"{column}_{func}"` → value, in aggregation order
    Aggregates(Measures),
    /// group label → rate, in ascending group order
    Rates(Measures),
}

/// `{answer, explanation, plan_used}`, produced on every path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub answer: Option<Answer>,
    pub explanation: String,
    pub plan_used: QueryPlan,
}

impl ResultEnvelope {
    pub fn answered(answer: Answer, explanation: impl Into<String>, plan: &QueryPlan) -> Self {
        Self {
            answer: Some(answer),
            explanation: explanation.into(),
            plan_used: plan.clone(),
        }
    }

    /// An envelope without an answer; clarifications and failures
    pub fn unanswered(explanation: impl Into<String>, plan: &QueryPlan) -> Self {
        Self {
            answer: None,
            explanation: explanation.into(),
            plan_used: plan.clone(),
        }
    }
}

/// Output of a successful handler before it is wrapped
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Computed {
    pub answer: Answer,
    pub explanation: String,
}

impl Computed {
    pub fn new(answer: Answer, explanation: impl Into<String>) -> Self {
        Self {
            answer,
            explanation: explanation.into(),
        }
    }
}

/// Rounds to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_measures_keep_first_position() {
        let mut m = Measures::new();
        m.insert("Age_mean", 1.0);
        m.insert("Fare_max", 2.0);
        m.insert("Age_mean", 3.0);

        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["Age_mean", "Fare_max"]);
        assert_eq!(m.get("Age_mean"), Some(3.0));
        assert_eq!(
            serde_json::to_string(&m).unwrap(),
            r#"{"Age_mean":3.0,"Fare_max":2.0}"#
        );
    }

    #[test]
    fn test_envelope_shape() {
        let plan = QueryPlan::count(None);
        let envelope = ResultEnvelope::answered(Answer::Count(3), "Total number of records", &plan);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "answer": 3,
                "explanation": "Total number of records",
                "plan_used": {"op": "count"}
            })
        );

        let envelope = ResultEnvelope::unanswered("Could you rephrase your question?", &plan);
        assert!(envelope.answer.is_none());
        assert_eq!(serde_json::to_value(&envelope).unwrap()["answer"], json!(null));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(38.383838), 38.38);
        assert_eq!(round2(2.0 / 3.0 * 100.0), 66.67);
        assert_eq!(round2(50.0), 50.0);
    }
}
