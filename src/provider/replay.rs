use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::nova::completion::CompletionResult;
use crate::provider::{ChatProvider, CompletionRequest};

/// Answers every turn with the contents of a file. JSON documents are
/// decoded into a result shape; anything else is replied verbatim.
pub struct ReplayProvider {
    path: PathBuf,
}

impl ReplayProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChatProvider for ReplayProvider {
    fn label(&self) -> &'static str {
        "replay"
    }

    fn invoke(&self, _request: &CompletionRequest<'_>) -> Result<CompletionResult> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read replay file {}", self.path.display()))?;
        let result = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => CompletionResult::from_value(value),
            Err(_) => CompletionResult::PlainText(raw.trim_end_matches(['\r', '\n']).to_string()),
        };
        Ok(result)
    }
}
