//! Provider results as a closed set of shapes.
//!
//! Providers do not agree on a response schema, so a result is classified
//! once, when it is decoded, into one of the variants of [`CompletionResult`].
//! The extractor and the raw-response view then match on the variant instead
//! of probing the value ad hoc.

use serde_json::{Map, Value};
use std::fmt;

/// Keys of a mapping whose scalar value is the reply itself, in priority order.
pub const TEXT_KEYS: [&str; 4] = ["response", "output", "text", "content"];
/// Keys of a mapping that hold ranked generation candidates, in priority order.
pub const GENERATION_KEYS: [&str; 2] = ["generations", "generation"];
/// Attributes probed on provider objects, in priority order.
pub const ATTRIBUTE_KEYS: [&str; 3] = ["response", "output", "text"];

/// A provider-defined object that exposes named fields.
pub trait ProviderObject: fmt::Debug {
    /// Value of the named field, `None` when the object has no such field.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Structured field dump, used by the raw-response view.
    fn to_value(&self) -> Value;

    /// Textual rendering used when no text-bearing field is found.
    fn render(&self) -> String {
        self.to_value().to_string()
    }
}

/// A decoded JSON value that is neither a string nor a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawValue(pub Value);

impl ProviderObject for RawValue {
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }

    fn to_value(&self) -> Value {
        self.0.clone()
    }
}

#[derive(Debug)]
pub enum CompletionResult {
    Empty,
    PlainText(String),
    Mapping(Map<String, Value>),
    /// A mapping whose reply lives under `generations`/`generation`.
    Candidates(Map<String, Value>),
    Opaque(Box<dyn ProviderObject>),
}

/// Stringified form of a string, integer or float; `None` for anything else.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// First truthy generation entry of a mapping.
pub fn generations(map: &Map<String, Value>) -> Option<&Value> {
    GENERATION_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| truthy(value))
}

fn has_scalar_text(map: &Map<String, Value>) -> bool {
    TEXT_KEYS
        .iter()
        .any(|key| map.get(*key).and_then(scalar_text).is_some())
}

impl CompletionResult {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => CompletionResult::Empty,
            Value::String(s) => CompletionResult::PlainText(s),
            Value::Object(map) => {
                if !has_scalar_text(&map) && generations(&map).is_some() {
                    CompletionResult::Candidates(map)
                } else {
                    CompletionResult::Mapping(map)
                }
            }
            other => CompletionResult::Opaque(Box::new(RawValue(other))),
        }
    }

    pub fn opaque(object: impl ProviderObject + 'static) -> Self {
        CompletionResult::Opaque(Box::new(object))
    }

    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            CompletionResult::Mapping(map) | CompletionResult::Candidates(map) => Some(map),
            _ => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            CompletionResult::Empty => "empty",
            CompletionResult::PlainText(_) => "plain-text",
            CompletionResult::Mapping(_) => "mapping",
            CompletionResult::Candidates(_) => "candidates",
            CompletionResult::Opaque(_) => "opaque",
        }
    }

    /// JSON view of the result.
    pub fn to_value(&self) -> Value {
        match self {
            CompletionResult::Empty => Value::Null,
            CompletionResult::PlainText(s) => Value::String(s.clone()),
            CompletionResult::Mapping(map) | CompletionResult::Candidates(map) => {
                Value::Object(map.clone())
            }
            CompletionResult::Opaque(object) => object.to_value(),
        }
    }

    /// Stringification of the whole result.
    pub fn render(&self) -> String {
        match self {
            CompletionResult::Empty => String::new(),
            CompletionResult::PlainText(s) => s.clone(),
            CompletionResult::Mapping(map) | CompletionResult::Candidates(map) => {
                Value::Object(map.clone()).to_string()
            }
            CompletionResult::Opaque(object) => object.render(),
        }
    }
}

impl From<Value> for CompletionResult {
    fn from(value: Value) -> Self {
        CompletionResult::from_value(value)
    }
}

impl From<String> for CompletionResult {
    fn from(value: String) -> Self {
        CompletionResult::PlainText(value)
    }
}

impl From<&str> for CompletionResult {
    fn from(value: &str) -> Self {
        CompletionResult::PlainText(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_classifies_each_shape() {
        assert_eq!(CompletionResult::from_value(Value::Null).shape(), "empty");
        assert_eq!(CompletionResult::from_value(json!("hi")).shape(), "plain-text");
        assert_eq!(
            CompletionResult::from_value(json!({"content": "hi"})).shape(),
            "mapping"
        );
        assert_eq!(
            CompletionResult::from_value(json!({"generations": [[{"text": "hi"}]]})).shape(),
            "candidates"
        );
        assert_eq!(CompletionResult::from_value(json!([1, 2])).shape(), "opaque");
        assert_eq!(CompletionResult::from_value(json!(42)).shape(), "opaque");
    }

    #[test]
    fn direct_text_key_outranks_generations() {
        let result = CompletionResult::from_value(json!({
            "text": "direct",
            "generations": [[{"text": "nested"}]]
        }));
        assert_eq!(result.shape(), "mapping");
    }

    #[test]
    fn empty_generations_stay_a_plain_mapping() {
        let result = CompletionResult::from_value(json!({"generations": [], "generation": null}));
        assert_eq!(result.shape(), "mapping");
    }

    #[test]
    fn falsy_generations_fall_back_to_singular_key() {
        let map = json!({"generations": [], "generation": [{"text": "one"}]});
        let Value::Object(map) = map else {
            unreachable!()
        };
        assert_eq!(generations(&map), Some(&json!([{"text": "one"}])));
    }

    #[test]
    fn truthiness_follows_emptiness() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!({})));
        assert!(truthy(&json!("x")));
        assert!(truthy(&json!([0])));
    }
}
