use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

use crate::error::NovaError;
use crate::nova::paths::NovaPaths;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, concise assistant.";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Groq,
    Replay,
}

impl ProviderKind {
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Replay => "replay",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "groq" | "openai-compatible" | "compatible" => Some(ProviderKind::Groq),
            "replay" | "fixture" => Some(ProviderKind::Replay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    pub temperature: f64,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub replay_path: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Groq,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            replay_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub system_prompt: String,
    pub show_raw_response: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            show_raw_response: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NovaConfig {
    pub provider: ProviderConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialNovaConfig {
    provider: Option<ProviderConfig>,
    chat: Option<ChatConfig>,
}

fn env_or_f64(var: &str, fallback: f64) -> f64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<f64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => {
            let trimmed = v.trim();
            match trimmed {
                "1" | "true" | "TRUE" | "yes" | "on" => true,
                "0" | "false" | "FALSE" | "no" | "off" => false,
                _ => fallback,
            }
        }
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_non_empty(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

pub fn validate_temperature(value: f64) -> Result<f64, NovaError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(NovaError::InvalidSetting(format!(
            "temperature {value} out of range: require 0.0 <= temperature <= 1.0"
        )))
    }
}

pub fn validate_model(value: &str) -> Result<String, NovaError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NovaError::InvalidSetting(
            "model name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

impl NovaConfig {
    pub fn validate(&self) -> Result<()> {
        validate_temperature(self.provider.temperature)?;
        validate_model(&self.provider.model)?;
        if self.provider.request_timeout_secs == 0 {
            return Err(NovaError::InvalidSetting(
                "request timeout must be >= 1 second".to_string(),
            )
            .into());
        }
        if self.provider.kind == ProviderKind::Groq && self.provider.base_url.trim().is_empty() {
            return Err(NovaError::InvalidSetting("base url cannot be empty".to_string()).into());
        }
        if self.provider.kind == ProviderKind::Replay
            && self
                .provider
                .replay_path
                .as_deref()
                .is_none_or(|p| p.trim().is_empty())
        {
            return Err(NovaError::InvalidSetting(
                "replay provider needs a response file (--replay or NOVA_REPLAY_PATH)".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

fn merge_file_config(base: &mut NovaConfig, paths: &NovaPaths) -> Result<()> {
    let path = &paths.config_file;
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path)
        .map_err(|err| NovaError::InvalidConfig(format!("{}: {err}", path.display())))?;
    let parsed: PartialNovaConfig = toml::from_str(&raw)
        .map_err(|err| NovaError::InvalidConfig(format!("{}: {err}", path.display())))?;
    if let Some(provider) = parsed.provider {
        base.provider = provider;
    }
    if let Some(chat) = parsed.chat {
        base.chat = chat;
    }
    Ok(())
}

fn apply_env_overrides(cfg: &mut NovaConfig) {
    if let Some(kind) = env_non_empty("NOVA_PROVIDER")
        .as_deref()
        .and_then(ProviderKind::parse)
    {
        cfg.provider.kind = kind;
    }
    cfg.provider.model = env_or_string("NOVA_MODEL", &cfg.provider.model);
    cfg.provider.temperature = env_or_f64("NOVA_TEMPERATURE", cfg.provider.temperature);
    cfg.provider.base_url = env_or_string("NOVA_BASE_URL", &cfg.provider.base_url);
    cfg.provider.request_timeout_secs = env_or_u64(
        "NOVA_REQUEST_TIMEOUT_SECS",
        cfg.provider.request_timeout_secs,
    );
    if let Some(path) = env_non_empty("NOVA_REPLAY_PATH") {
        cfg.provider.replay_path = Some(path);
    }
    cfg.chat.show_raw_response = env_or_bool("NOVA_SHOW_RAW", cfg.chat.show_raw_response);
    cfg.chat.system_prompt = env_or_string("NOVA_SYSTEM_PROMPT", &cfg.chat.system_prompt);
}

/// Defaults, then the config file, then `NOVA_*` env vars, then `overrides`.
pub fn load_config(
    paths: &NovaPaths,
    overrides: impl FnOnce(&mut NovaConfig) -> Result<()>,
) -> Result<NovaConfig> {
    let mut cfg = NovaConfig::default();
    merge_file_config(&mut cfg, paths)?;
    apply_env_overrides(&mut cfg);
    overrides(&mut cfg)?;
    cfg.validate()?;
    Ok(cfg)
}
