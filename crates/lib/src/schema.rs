//! # Schema Enforcement
//!
//! Turns a normalized model response into a `CaptionRecord` with every field
//! present. Parsing can fail; enforcement cannot. Missing or mistyped values
//! are replaced by empty defaults rather than reported.

use crate::errors::GatewayError;
use crate::types::{CaptionRecord, Entities, ErrorRecord, LooseRecord};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Prefix of the `error` field of every `ErrorRecord`.
pub const PARSE_FAILURE_PREFIX: &str = "Failed to parse response";

/// Parses normalized text into a `LooseRecord`.
///
/// A gateway error passed through the normalizer is always a parse failure.
/// Valid JSON that is not an object is a parse failure too.
pub fn parse_loose_record(normalized: Result<&str, &GatewayError>) -> LooseRecord {
    let text = match normalized {
        Ok(text) => text,
        Err(e) => return LooseRecord::ParseFailed(format!("caption request failed: {e}")),
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => LooseRecord::Parsed(map),
        Ok(other) => LooseRecord::ParseFailed(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        )),
        Err(e) => LooseRecord::ParseFailed(e.to_string()),
    }
}

/// Builds the error record persisted in place of a parse failure.
pub fn error_record(message: &str, raw: &Result<String, GatewayError>) -> ErrorRecord {
    ErrorRecord {
        error: format!("{PARSE_FAILURE_PREFIX}: {message}"),
        raw: raw.as_ref().ok().cloned(),
    }
}

/// Rebuilds a parsed response into the fixed record shape.
///
/// `filename` always comes from the caller; a `filename` key in the response
/// is ignored.
pub fn enforce_schema(filename: &str, fields: &Map<String, Value>) -> CaptionRecord {
    let entities = match fields.get("entities") {
        Some(Value::Object(map)) => Entities {
            people: string_list(map.get("people")),
            organizations: string_list(map.get("organizations")),
            locations: string_list(map.get("locations")),
            date_estimate: trimmed_string(map.get("date_estimate")),
        },
        _ => Entities::default(),
    };

    CaptionRecord {
        filename: filename.to_string(),
        caption: trimmed_string(fields.get("caption")),
        detailed_description: trimmed_string(fields.get("detailed_description")),
        tags: normalize_tags(string_list(fields.get("tags"))),
        contextual_category: trimmed_string(fields.get("contextual_category")),
        entities,
    }
}

/// Deduplicates tags by exact string and sorts them.
///
/// Case is significant: `"Finance"` and `"finance"` are both kept.
pub fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    tags.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn trimmed_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_empty_object_gets_all_defaults() {
        let record = enforce_schema("a.jpg", &Map::new());
        assert_eq!(
            record,
            CaptionRecord {
                filename: "a.jpg".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_every_subset_of_missing_keys_is_total() {
        let full = json!({
            "caption": " c ",
            "detailed_description": " d ",
            "tags": ["t"],
            "contextual_category": " k ",
            "entities": {
                "people": ["p"],
                "organizations": ["o"],
                "locations": ["l"],
                "date_estimate": " 1923 "
            }
        });
        let keys = [
            "caption",
            "detailed_description",
            "tags",
            "contextual_category",
            "entities",
        ];

        for mask in 0u32..(1 << keys.len()) {
            let mut map = parsed(full.clone());
            for (i, key) in keys.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    map.remove(*key);
                }
            }
            let record = enforce_schema("x.jpg", &map);
            let serialized = serde_json::to_value(&record).unwrap();
            let object = serialized.as_object().unwrap();
            for key in keys.iter().chain(["filename"].iter()) {
                assert!(object.contains_key(*key), "mask {mask:b} dropped {key}");
            }
            let entities = object["entities"].as_object().unwrap();
            assert_eq!(entities.len(), 4);
            assert!(entities["people"].is_array());
            assert!(entities["date_estimate"].is_string());

            let caption_expected = if mask & 1 != 0 { "" } else { "c" };
            assert_eq!(record.caption, caption_expected);
        }
    }

    #[test]
    fn test_missing_entity_subfields_default_independently() {
        let map = parsed(json!({"entities": {"people": ["Ada Lovelace"]}}));
        let record = enforce_schema("a.jpg", &map);
        assert_eq!(record.entities.people, vec!["Ada Lovelace"]);
        assert!(record.entities.organizations.is_empty());
        assert!(record.entities.locations.is_empty());
        assert_eq!(record.entities.date_estimate, "");
    }

    #[test]
    fn test_non_object_entities_behave_as_absent() {
        let map = parsed(json!({"entities": ["not", "an", "object"]}));
        assert_eq!(enforce_schema("a.jpg", &map).entities, Entities::default());
    }

    #[test]
    fn test_string_fields_are_trimmed() {
        let map = parsed(json!({
            "caption": "  A ledger page.\n",
            "detailed_description": "\tA bound volume. ",
            "contextual_category": " Historical Business Document "
        }));
        let record = enforce_schema("a.jpg", &map);
        assert_eq!(record.caption, "A ledger page.");
        assert_eq!(record.detailed_description, "A bound volume.");
        assert_eq!(record.contextual_category, "Historical Business Document");
    }

    #[test]
    fn test_mistyped_values_are_coerced() {
        let map = parsed(json!({
            "caption": null,
            "detailed_description": ["x"],
            "contextual_category": 42,
            "tags": "single",
            "entities": {
                "people": [null, "Ada", 7, {"n": 1}],
                "locations": "Boston",
                "organizations": 3,
                "date_estimate": true
            }
        }));
        let record = enforce_schema("a.jpg", &map);
        assert_eq!(record.caption, "");
        assert_eq!(record.detailed_description, "");
        assert_eq!(record.contextual_category, "42");
        assert_eq!(record.tags, vec!["single"]);
        assert_eq!(record.entities.people, vec!["Ada", "7"]);
        assert_eq!(record.entities.locations, vec!["Boston"]);
        assert!(record.entities.organizations.is_empty());
        assert_eq!(record.entities.date_estimate, "true");
    }

    #[test]
    fn test_filename_key_in_response_is_ignored() {
        let map = parsed(json!({"filename": "model-invented.png"}));
        assert_eq!(enforce_schema("real.jpg", &map).filename, "real.jpg");
    }

    #[test]
    fn test_tags_are_deduplicated_case_sensitively_and_sorted() {
        let tags = ["finance", "Finance", "ledger", "finance", "Archive"]
            .map(String::from)
            .to_vec();
        assert_eq!(
            normalize_tags(tags),
            vec!["Archive", "Finance", "finance", "ledger"]
        );
    }

    #[test]
    fn test_tag_normalization_is_idempotent() {
        let tags = ["b", "a", "b", "C", "a"].map(String::from).to_vec();
        let once = normalize_tags(tags);
        let twice = normalize_tags(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_entity_lists_keep_order_and_duplicates() {
        let map = parsed(json!({"entities": {"people": ["Zed", "Amy", "Zed"]}}));
        assert_eq!(
            enforce_schema("a.jpg", &map).entities.people,
            vec!["Zed", "Amy", "Zed"]
        );
    }

    #[test]
    fn test_parse_object() {
        let record = parse_loose_record(Ok(r#"{"caption": "x"}"#));
        assert!(matches!(record, LooseRecord::Parsed(ref m) if m.contains_key("caption")));
    }

    #[test]
    fn test_parse_invalid_json() {
        let record = parse_loose_record(Ok("The image shows a ledger."));
        assert!(matches!(record, LooseRecord::ParseFailed(_)));
    }

    #[test]
    fn test_parse_non_object_json() {
        match parse_loose_record(Ok(r#"["a", "b"]"#)) {
            LooseRecord::ParseFailed(msg) => assert!(msg.contains("an array")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_gateway_error() {
        let err = GatewayError::AiApi("quota exceeded".to_string());
        match parse_loose_record(Err(&err)) {
            LooseRecord::ParseFailed(msg) => {
                assert!(msg.contains("caption request failed"));
                assert!(msg.contains("quota exceeded"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_error_record_keeps_raw_text() {
        let raw: Result<String, GatewayError> = Ok("```json\nnot json\n```".to_string());
        let record = error_record("expected value", &raw);
        assert_eq!(record.error, "Failed to parse response: expected value");
        assert_eq!(record.raw.as_deref(), Some("```json\nnot json\n```"));
    }

    #[test]
    fn test_error_record_without_raw_text() {
        let raw: Result<String, GatewayError> = Err(GatewayError::EmptyResponse);
        assert_eq!(error_record("boom", &raw).raw, None);
    }
}
