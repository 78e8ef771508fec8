use serde_json::Value;

use crate::error::NovaError;
use crate::nova::completion::CompletionResult;
use crate::nova::config::{NovaConfig, validate_model, validate_temperature};
use crate::nova::extract::extract;
use crate::nova::message::Message;
use crate::nova::redact::redact_result;
use crate::provider::{ChatProvider, CompletionRequest};

pub const UNPARSED_REPLY: &str = "Sorry — I couldn't parse the response.";

/// Settings applied to the next provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f64,
    pub show_raw_response: bool,
}

impl ChatSettings {
    pub fn set_temperature(&mut self, value: f64) -> Result<(), NovaError> {
        self.temperature = validate_temperature(value)?;
        Ok(())
    }

    pub fn set_model(&mut self, value: &str) -> Result<(), NovaError> {
        self.model = validate_model(value)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    pub failed: bool,
    /// Redacted raw result, present when the raw view is enabled.
    pub raw_view: Option<Value>,
}

/// Conversation state for one chat. History is append-only between clears.
#[derive(Debug)]
pub struct Session {
    system_prompt: String,
    pub settings: ChatSettings,
    history: Vec<Message>,
    last_result: Option<CompletionResult>,
}

impl Session {
    pub fn new(system_prompt: impl Into<String>, settings: ChatSettings) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            settings,
            history: Vec::new(),
            last_result: None,
        }
    }

    pub fn from_config(cfg: &NovaConfig) -> Self {
        Self::new(
            cfg.chat.system_prompt.clone(),
            ChatSettings {
                model: cfg.provider.model.clone(),
                temperature: cfg.provider.temperature,
                show_raw_response: cfg.chat.show_raw_response,
            },
        )
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.last_result = None;
    }

    /// The system message followed by the history, as sent to the provider.
    pub fn transcript(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(self.history.iter().cloned());
        messages
    }

    pub fn last_raw_view(&self) -> Option<Value> {
        self.last_result.as_ref().map(redact_result)
    }

    /// Runs one turn. Empty input is ignored; provider failures become an
    /// assistant message starting with `Error: `.
    pub fn run_turn(&mut self, provider: &dyn ChatProvider, user_input: &str) -> Option<TurnOutcome> {
        if user_input.trim().is_empty() {
            return None;
        }
        self.history.push(Message::user(user_input));

        let messages = self.transcript();
        let request = CompletionRequest {
            model: &self.settings.model,
            temperature: self.settings.temperature,
            messages: &messages,
        };
        tracing::info!(
            provider = provider.label(),
            model = request.model,
            temperature = request.temperature,
            messages = messages.len(),
            "invoking provider"
        );

        let outcome = match provider.invoke(&request) {
            Ok(result) => {
                let mut reply = extract(&result);
                if reply.is_empty() {
                    tracing::warn!(shape = result.shape(), "no text extracted from provider result");
                    reply = UNPARSED_REPLY.to_string();
                }
                let raw_view = self
                    .settings
                    .show_raw_response
                    .then(|| redact_result(&result));
                self.last_result = Some(result);
                TurnOutcome {
                    reply,
                    failed: false,
                    raw_view,
                }
            }
            Err(err) => {
                tracing::warn!(provider = provider.label(), error = %format!("{err:#}"), "provider call failed");
                TurnOutcome {
                    reply: format!("Error: {err:#}"),
                    failed: true,
                    raw_view: None,
                }
            }
        };

        self.history.push(Message::assistant(outcome.reply.clone()));
        Some(outcome)
    }
}
