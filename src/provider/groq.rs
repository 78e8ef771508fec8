use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::NovaError;
use crate::nova::completion::{CompletionResult, ProviderObject};
use crate::nova::message::Message;
use crate::nova::util::truncate_with_ellipsis;
use crate::provider::{ChatProvider, CompletionRequest};

const MAX_ERROR_BODY_CHARS: usize = 300;

pub struct GroqProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

/// `max_tokens` is never sent: output length is left to the provider.
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
}

impl GroqProvider {
    pub fn new(api_key: String, base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build http client")?;
        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            api_key,
            endpoint: format!("{base}/chat/completions"),
        })
    }
}

fn error_description(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        json.get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    let text = from_json.unwrap_or_else(|| body.trim().to_string());
    truncate_with_ellipsis(&text, MAX_ERROR_BODY_CHARS)
}

impl ChatProvider for GroqProvider {
    fn label(&self) -> &'static str {
        "groq"
    }

    fn invoke(&self, request: &CompletionRequest<'_>) -> Result<CompletionResult> {
        let body = ChatCompletionBody {
            model: request.model,
            messages: request.messages,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .with_context(|| format!("request to {} failed", self.endpoint))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(NovaError::ProviderInvocation(format!(
                "status {status}: {}",
                error_description(&text)
            ))
            .into());
        }

        let json: Value = response
            .json()
            .context("provider response was not valid JSON")?;
        Ok(CompletionResult::opaque(ChatCompletion::new(json)))
    }
}

/// Chat-completions response exposing its first choice as attributes.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    raw: Value,
}

impl ChatCompletion {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    fn first_choice(&self) -> Option<&Value> {
        self.raw.get("choices").and_then(Value::as_array)?.first()
    }

    fn message_text(&self) -> Option<String> {
        let content = self.first_choice()?.get("message")?.get("content")?;
        match content {
            Value::String(s) => Some(s.to_string()),
            Value::Array(parts) => {
                let chunks: Vec<&str> = parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect();
                if chunks.is_empty() {
                    None
                } else {
                    Some(chunks.join("\n"))
                }
            }
            _ => None,
        }
    }
}

impl ProviderObject for ChatCompletion {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "text" | "content" => self.message_text().map(Value::String),
            "finish_reason" => self.first_choice()?.get("finish_reason").cloned(),
            other => self.raw.get(other).cloned(),
        }
    }

    fn to_value(&self) -> Value {
        self.raw.clone()
    }
}
