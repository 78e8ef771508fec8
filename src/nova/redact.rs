use serde_json::{Map, Value};

use crate::nova::completion::CompletionResult;

pub const REDACTED: &str = "<REDACTED>";

const SENSITIVE_KEY_PARTS: [&str; 6] = ["token", "usage", "logprob", "logprobs", "raw", "hidden"];

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_KEY_PARTS.iter().any(|part| lower.contains(part))
}

/// Copy of `value` with every entry under a sensitive key masked.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::with_capacity(map.len());
            for (key, val) in map {
                let masked = if is_sensitive_key(key) {
                    Value::String(REDACTED.to_string())
                } else {
                    redact(val)
                };
                redacted.insert(key.clone(), masked);
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// Redacted JSON view of a provider result for the raw-response display.
pub fn redact_result(result: &CompletionResult) -> Value {
    redact(&result.to_value())
}
