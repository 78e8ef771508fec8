//! Best-effort assistant text from a provider result.
//!
//! Extraction is an ordered list of attempts. Each attempt either claims the
//! result by returning `Some(text)` or passes it on; when none claims it the
//! whole result is stringified, unless the dump looks like token accounting
//! or other internals, in which case a fixed placeholder is shown instead.

use serde_json::Value;

use crate::nova::completion::{
    ATTRIBUTE_KEYS, CompletionResult, TEXT_KEYS, generations, scalar_text, truthy,
};

pub const COMPLEX_OBJECT_PLACEHOLDER: &str =
    "[Model returned a complex object — textual output extracted.]";

const CANDIDATE_KEYS: [&str; 2] = ["text", "content"];
const DUMP_SUPPRESS_MARKERS: [&str; 4] = ["usage", "token", "logprob", "hidden"];

type Attempt = fn(&CompletionResult) -> Option<String>;

const ATTEMPTS: [Attempt; 4] = [direct_text, mapping_text_key, first_candidate, object_attribute];

pub fn extract(result: &CompletionResult) -> String {
    ATTEMPTS
        .iter()
        .find_map(|attempt| attempt(result))
        .unwrap_or_else(|| fallback_dump(result))
}

fn direct_text(result: &CompletionResult) -> Option<String> {
    match result {
        CompletionResult::Empty => Some(String::new()),
        CompletionResult::PlainText(text) => Some(text.clone()),
        _ => None,
    }
}

fn mapping_text_key(result: &CompletionResult) -> Option<String> {
    let map = result.as_mapping()?;
    TEXT_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(scalar_text)
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn candidate_text(candidate: &Value) -> String {
    let Value::Object(fields) = candidate else {
        return String::new();
    };
    CANDIDATE_KEYS
        .iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| truthy(value))
        .map(display_text)
        .unwrap_or_default()
}

/// `generations` is either a list of candidates or a list of candidate lists.
/// A candidate without text claims the result with an empty string; a
/// malformed container passes it on.
fn first_candidate(result: &CompletionResult) -> Option<String> {
    let map = result.as_mapping()?;
    let Value::Array(entries) = generations(map)? else {
        return None;
    };
    let candidate = match entries.first()? {
        Value::Array(ranked) => ranked.first()?,
        single => single,
    };
    Some(candidate_text(candidate))
}

fn object_attribute(result: &CompletionResult) -> Option<String> {
    let CompletionResult::Opaque(object) = result else {
        return None;
    };
    ATTRIBUTE_KEYS
        .iter()
        .filter_map(|name| object.attribute(name))
        .find_map(|value| scalar_text(&value))
}

fn fallback_dump(result: &CompletionResult) -> String {
    let rendered = result.render();
    let lower = rendered.to_lowercase();
    if DUMP_SUPPRESS_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
    {
        tracing::debug!(shape = result.shape(), "suppressed raw dump of provider result");
        return COMPLEX_OBJECT_PLACEHOLDER.to_string();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nova::completion::ProviderObject;
    use serde_json::json;

    #[derive(Debug)]
    struct Fields(Value);

    impl ProviderObject for Fields {
        fn attribute(&self, name: &str) -> Option<Value> {
            self.0.get(name).cloned()
        }

        fn to_value(&self) -> Value {
            self.0.clone()
        }
    }

    fn extract_json(value: Value) -> String {
        extract(&CompletionResult::from_value(value))
    }

    #[test]
    fn strings_pass_through_unchanged() {
        for s in ["", "hello", "usage: 12 tokens", "  spaced  "] {
            assert_eq!(extract(&CompletionResult::from(s)), s);
        }
    }

    #[test]
    fn null_result_is_empty() {
        assert_eq!(extract_json(Value::Null), "");
    }

    #[test]
    fn content_key_is_returned() {
        assert_eq!(extract_json(json!({"content": "hello", "id": "x"})), "hello");
    }

    #[test]
    fn text_keys_follow_priority_order() {
        let payload = json!({"content": "c", "text": "t", "output": "o", "response": "r"});
        assert_eq!(extract_json(payload), "r");

        let payload = json!({"content": "c", "text": "t", "response": null});
        assert_eq!(extract_json(payload), "t");
    }

    #[test]
    fn numeric_text_keys_are_stringified() {
        assert_eq!(extract_json(json!({"output": 42})), "42");
        assert_eq!(extract_json(json!({"output": 1.5})), "1.5");
    }

    #[test]
    fn nested_candidate_lists_use_first_candidate() {
        assert_eq!(
            extract_json(json!({"generations": [[{"text": "hi"}, {"text": "other"}]]})),
            "hi"
        );
    }

    #[test]
    fn flat_candidate_lists_use_first_candidate() {
        assert_eq!(extract_json(json!({"generations": [{"content": "hi2"}]})), "hi2");
        assert_eq!(extract_json(json!({"generation": [{"text": "single"}]})), "single");
    }

    #[test]
    fn candidate_prefers_truthy_text_over_content() {
        assert_eq!(
            extract_json(json!({"generations": [{"text": "", "content": "fallback"}]})),
            "fallback"
        );
    }

    #[test]
    fn candidate_without_text_yields_empty_string() {
        assert_eq!(extract_json(json!({"generations": [[{"score": 0.2}]]})), "");
        assert_eq!(extract_json(json!({"generations": ["bare"]})), "");
    }

    #[test]
    fn malformed_generations_fall_through_to_dump() {
        assert_eq!(
            extract_json(json!({"generations": [[]]})),
            r#"{"generations":[[]]}"#
        );
        assert_eq!(
            extract_json(json!({"generations": {"text": "not a list"}})),
            r#"{"generations":{"text":"not a list"}}"#
        );
    }

    #[test]
    fn object_attribute_is_stringified() {
        let result = CompletionResult::opaque(Fields(json!({"output": 42})));
        assert_eq!(extract(&result), "42");
    }

    #[test]
    fn object_attributes_follow_priority_and_skip_non_scalars() {
        let result = CompletionResult::opaque(Fields(json!({
            "response": {"nested": true},
            "output": null,
            "text": "from text"
        })));
        assert_eq!(extract(&result), "from text");
    }

    #[test]
    fn object_content_attribute_is_not_probed() {
        let result = CompletionResult::opaque(Fields(json!({"content": "ignored"})));
        assert_eq!(extract(&result), r#"{"content":"ignored"}"#);
    }

    #[test]
    fn usage_dumps_are_replaced_by_placeholder() {
        let payload = json!({"choices": [], "usage": {"total_tokens": 12}});
        assert_eq!(extract_json(payload), COMPLEX_OBJECT_PLACEHOLDER);

        let result = CompletionResult::opaque(Fields(json!({"meta": "Hidden state"})));
        assert_eq!(extract(&result), COMPLEX_OBJECT_PLACEHOLDER);
    }

    #[test]
    fn harmless_dumps_are_returned_verbatim() {
        assert_eq!(extract_json(json!({"id": 7})), r#"{"id":7}"#);
        assert_eq!(extract_json(json!([1, 2])), "[1,2]");
        assert_eq!(extract_json(json!(true)), "true");
    }
}
