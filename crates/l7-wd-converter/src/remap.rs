//! Body rewrites for commands that share a URL across dialects but disagree on
//! field names.
//!
//! Bodies arrive either as raw JSON text or already parsed. Anything that does
//! not parse to an object is opaque: the functions here return `None` and the
//! caller forwards what it received.

use serde_json::{Map, Value};

use crate::dialect::Dialect;

const NAME_KEY: &str = "name";
const HANDLE_KEY: &str = "handle";
const TEXT_KEY: &str = "text";
const VALUE_KEY: &str = "value";

/// Parses `body` into a JSON object, if it is one.
pub fn parse_object(body: Option<&Value>) -> Option<Map<String, Value>> {
    let parsed = match body? {
        Value::String(raw) => serde_json::from_str::<Value>(raw).ok()?,
        other => other.clone(),
    };
    match parsed {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// `setWindow`: the legacy dialect addresses windows by `name`, the
/// consolidated one by `handle`.
pub fn window_target(body: Option<&Value>, dialect: Dialect) -> Option<Value> {
    let object = parse_object(body)?;
    let (from, to) = match dialect {
        Dialect::Consolidated => (NAME_KEY, HANDLE_KEY),
        Dialect::Legacy => (HANDLE_KEY, NAME_KEY),
        Dialect::Unset => return None,
    };
    if object.contains_key(to) {
        return None;
    }
    let target = object.get(from)?;
    let mut remapped = Map::new();
    remapped.insert(to.to_string(), target.clone());
    Some(Value::Object(remapped))
}

/// `setValue`: legacy peers read a `value` array of characters, consolidated
/// peers read a `text` string. Whichever is missing is derived from the other.
pub fn element_value(body: Option<&Value>) -> Option<Value> {
    let mut object = parse_object(body)?;
    let has_text = is_truthy(object.get(TEXT_KEY));
    let has_value = is_truthy(object.get(VALUE_KEY));

    if has_text && !has_value {
        let chars = match &object[TEXT_KEY] {
            Value::String(text) => text
                .chars()
                .map(|c| Value::String(c.to_string()))
                .collect(),
            Value::Array(items) => items.clone(),
            _ => Vec::new(),
        };
        object.insert(VALUE_KEY.into(), Value::Array(chars));
    } else if has_value && !has_text {
        let text = match &object[VALUE_KEY] {
            Value::Array(items) => items.iter().map(join_fragment).collect::<String>(),
            Value::String(text) => text.clone(),
            _ => String::new(),
        };
        object.insert(TEXT_KEY.into(), Value::String(text));
    } else {
        return None;
    }
    Some(Value::Object(object))
}

fn join_fragment(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn name_becomes_handle_for_consolidated() {
        let body = json!({ "name": "main" });
        assert_eq!(
            window_target(Some(&body), Dialect::Consolidated),
            Some(json!({ "handle": "main" }))
        );
    }

    #[test]
    fn handle_becomes_name_for_legacy() {
        let body = Value::String(r#"{"handle":"CDwindow-1"}"#.into());
        assert_eq!(
            window_target(Some(&body), Dialect::Legacy),
            Some(json!({ "name": "CDwindow-1" }))
        );
    }

    #[test]
    fn matching_or_ambiguous_bodies_are_left_alone() {
        let name_only = json!({ "name": "main" });
        assert_eq!(window_target(Some(&name_only), Dialect::Legacy), None);

        let both = json!({ "name": "main", "handle": "main" });
        assert_eq!(window_target(Some(&both), Dialect::Consolidated), None);
        assert_eq!(window_target(Some(&both), Dialect::Legacy), None);
    }

    #[test]
    fn opaque_bodies_are_not_objects() {
        assert_eq!(parse_object(None), None);
        assert_eq!(parse_object(Some(&json!("not json {"))), None);
        assert_eq!(parse_object(Some(&json!("[1,2]"))), None);
        assert_eq!(parse_object(Some(&json!(42))), None);
        assert_eq!(window_target(Some(&json!(["main"])), Dialect::Consolidated), None);
    }

    #[test]
    fn text_is_split_into_value_characters() {
        let body = json!({ "text": "héy" });
        assert_eq!(
            element_value(Some(&body)),
            Some(json!({ "text": "héy", "value": ["h", "é", "y"] }))
        );
    }

    #[test]
    fn value_array_is_joined_into_text() {
        let body = json!({ "value": ["a", "b", 1] });
        assert_eq!(
            element_value(Some(&body)),
            Some(json!({ "value": ["a", "b", 1], "text": "ab1" }))
        );
    }

    #[test]
    fn complete_or_empty_value_bodies_pass_through() {
        assert_eq!(
            element_value(Some(&json!({ "text": "a", "value": ["a"] }))),
            None
        );
        assert_eq!(element_value(Some(&json!({ "text": "" }))), None);
        assert_eq!(element_value(Some(&json!("nope"))), None);
    }
}
