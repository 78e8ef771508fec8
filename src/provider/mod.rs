pub mod groq;
pub mod replay;

use anyhow::Result;

use crate::nova::completion::CompletionResult;
use crate::nova::config::{ProviderConfig, ProviderKind};
use crate::nova::credentials::require_api_key;
use crate::nova::message::Message;
use crate::nova::paths::NovaPaths;

#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f64,
    pub messages: &'a [Message],
}

pub trait ChatProvider {
    fn label(&self) -> &'static str;
    fn invoke(&self, request: &CompletionRequest<'_>) -> Result<CompletionResult>;
}

/// Fails with a missing-credential error when the hosted provider has no key.
pub fn build_provider(cfg: &ProviderConfig, paths: &NovaPaths) -> Result<Box<dyn ChatProvider>> {
    match cfg.kind {
        ProviderKind::Groq => {
            let api_key = require_api_key(paths)?;
            let provider =
                groq::GroqProvider::new(api_key, &cfg.base_url, cfg.request_timeout_secs)?;
            Ok(Box::new(provider))
        }
        ProviderKind::Replay => {
            let path = cfg.replay_path.as_deref().unwrap_or_default();
            Ok(Box::new(replay::ReplayProvider::new(path)))
        }
    }
}
