use serde_json::{Map, Value};

use crate::domain::medication::{entities::TextSource, value_objects::LLMResponse};

/// Parses a model reply into a JSON object.
///
/// Tries the whole string first, then the greedy `{ ... }` span from the
/// first opening brace to the last closing brace. Non-object JSON counts as
/// a failure.
pub fn parse_model_json(raw_text: &str) -> Option<Map<String, Value>> {
    if let Some(map) = parse_object(raw_text) {
        return Some(map);
    }

    let start = raw_text.find('{')?;
    let end = raw_text.rfind('}')?;
    if end <= start {
        return None;
    }

    parse_object(&raw_text[start..=end])
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Returns the first non-empty string found in a pre-order walk of `value`.
pub fn find_first_string(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
        Value::Array(items) => items.iter().find_map(find_first_string),
        Value::Object(map) => map.values().find_map(find_first_string),
        _ => None,
    }
}

/// Picks the raw text out of a model response: the text accessor, then a
/// nested search of the raw body, then the body's string form.
pub fn extract_raw_text(response: &LLMResponse) -> (String, TextSource) {
    let attribute = response.text.as_deref().map(str::trim).unwrap_or_default();
    if !attribute.is_empty() {
        return (attribute.to_string(), TextSource::Attribute);
    }

    if let Some(found) = find_first_string(&response.raw) {
        return (found.to_string(), TextSource::NestedSearch);
    }

    match &response.raw {
        Value::Null => (String::new(), TextSource::None),
        other => (other.to_string(), TextSource::Repr),
    }
}

/// Top-level keys of the raw response, for diagnostics.
pub fn raw_keys(raw: &Value) -> Vec<String> {
    raw.as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_strict_object_round_trips() {
        let obj = json!({
            "medicationName": "Amoxicillin",
            "instructions": ["With food", "Finish the course"],
            "nested": { "a": [1, 2, { "b": null }] }
        });
        let parsed = parse_model_json(&obj.to_string()).unwrap();
        assert_eq!(Value::Object(parsed), obj);
    }

    #[test]
    fn test_parse_recovers_embedded_object() {
        let parsed =
            parse_model_json("Here is the result: {\"medicationName\":\"X\"} Thanks!").unwrap();
        assert_eq!(Value::Object(parsed), json!({ "medicationName": "X" }));
    }

    #[test]
    fn test_parse_recovers_fenced_block() {
        let raw = "```json\n{\"dosage\": \"10mg\"}\n```";
        let parsed = parse_model_json(raw).unwrap();
        assert_eq!(parsed.get("dosage"), Some(&json!("10mg")));
    }

    #[test]
    fn test_parse_returns_none_without_structure() {
        assert!(parse_model_json("no structure here").is_none());
        assert!(parse_model_json("").is_none());
        assert!(parse_model_json("} backwards {").is_none());
    }

    #[test]
    fn test_parse_rejects_non_object_json() {
        assert!(parse_model_json("[1, 2, 3]").is_none());
        assert!(parse_model_json("\"just a string\"").is_none());
    }

    #[test]
    fn test_parse_greedy_span_over_two_objects_fails() {
        // First `{` to last `}` spans both objects and is not valid JSON.
        assert!(parse_model_json("a {\"x\": 1} and {\"y\": 2}").is_none());
    }

    #[test]
    fn test_find_first_string_is_pre_order() {
        let value = json!({
            "candidates": [
                { "index": 0, "content": { "parts": [{ "text": "  " }, { "text": "found" }] } }
            ],
            "modelVersion": "later"
        });
        assert_eq!(find_first_string(&value), Some("found"));
        assert_eq!(find_first_string(&json!([1, true, null])), None);
    }

    #[test]
    fn test_extract_raw_text_prefers_attribute() {
        let response = LLMResponse::new(
            Some("  {\"a\": 1}  ".to_string()),
            json!({ "other": "ignored" }),
        );
        let (text, source) = extract_raw_text(&response);
        assert_eq!(text, "{\"a\": 1}");
        assert_eq!(source, TextSource::Attribute);
    }

    #[test]
    fn test_extract_raw_text_falls_back_to_nested_then_repr() {
        let nested = LLMResponse::new(Some("   ".to_string()), json!({ "x": ["deep"] }));
        assert_eq!(
            extract_raw_text(&nested),
            ("deep".to_string(), TextSource::NestedSearch)
        );

        let repr = LLMResponse::new(None, json!({ "n": 1 }));
        assert_eq!(
            extract_raw_text(&repr),
            ("{\"n\":1}".to_string(), TextSource::Repr)
        );

        let empty = LLMResponse::default();
        assert_eq!(extract_raw_text(&empty), (String::new(), TextSource::None));
    }

    #[test]
    fn test_raw_keys_lists_top_level_keys() {
        let keys = raw_keys(&json!({ "candidates": [], "usageMetadata": {} }));
        assert_eq!(keys, vec!["candidates", "usageMetadata"]);
        assert!(raw_keys(&json!("text")).is_empty());
    }
}
