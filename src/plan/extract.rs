//! Recovering a plan from free-form translator output

use serde_json::Value;

use super::query_plan::QueryPlan;

/// Extracts the first JSON object carrying an `op` field
///
/// Tries the whole text first, then the span between the first `{` and the
/// last `}`. Text that yields no such object returns `None`.
pub fn extract_plan(text: &str) -> Option<QueryPlan> {
    let text = text.trim();
    if let Some(plan) = parse_object(text) {
        return Some(plan);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&text[start..=end])
}

fn parse_object(candidate: &str) -> Option<QueryPlan> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) if value.get("op").is_some() => {
            Some(QueryPlan::from_value(value))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        let plan = extract_plan(r#"{"op": "count", "filter": "Age > 30"}"#).unwrap();
        assert_eq!(plan.op(), "count");
    }

    #[test]
    fn test_object_inside_prose() {
        let text = "Sure! Here is the plan:\n```json\n{\"op\": \"compare\", \"column\": \"Survived\", \"by\": \"Sex\"}\n```";
        let plan = extract_plan(text).unwrap();
        assert_eq!(plan.op(), "compare");
    }

    #[test]
    fn test_rejects_objects_without_op() {
        assert!(extract_plan(r#"{"operation": "count"}"#).is_none());
        assert!(extract_plan("no json here").is_none());
        assert!(extract_plan("} backwards {").is_none());
        assert!(extract_plan("[1, 2]").is_none());
    }
}
