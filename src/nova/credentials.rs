use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::env;
use std::fs;

use crate::error::NovaError;
use crate::nova::paths::NovaPaths;

pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Trim whitespace and strip surrounding ASCII or typographic quotes.
pub fn normalize_api_key(raw: &str) -> String {
    fn is_quote_char(c: char) -> bool {
        matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’')
    }

    let mut s = raw.trim();
    while s.chars().count() > 1 && s.starts_with(is_quote_char) {
        s = &s[s.chars().next().map_or(0, char::len_utf8)..];
    }
    while s.chars().count() > 1 && s.ends_with(is_quote_char) {
        s = &s[..s.len() - s.chars().next_back().map_or(0, char::len_utf8)];
    }
    s.trim().to_string()
}

fn from_env() -> Option<String> {
    let raw = env::var(API_KEY_VAR).ok()?;
    let key = normalize_api_key(&raw);
    (!key.is_empty()).then_some(key)
}

fn from_secrets_file(paths: &NovaPaths) -> Result<Option<String>> {
    let path = &paths.secrets_file;
    if !path.is_file() {
        return Ok(None);
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let table: BTreeMap<String, toml::Value> = toml::from_str(&raw)
        .map_err(|err| NovaError::InvalidConfig(format!("{}: {err}", path.display())))?;
    let key = table
        .get(API_KEY_VAR)
        .and_then(toml::Value::as_str)
        .map(normalize_api_key)
        .filter(|k| !k.is_empty());
    Ok(key)
}

pub fn lookup_api_key(paths: &NovaPaths) -> Result<Option<String>> {
    if let Some(key) = from_env() {
        return Ok(Some(key));
    }
    from_secrets_file(paths)
}

pub fn require_api_key(paths: &NovaPaths) -> Result<String> {
    match lookup_api_key(paths)? {
        Some(key) => Ok(key),
        None => Err(NovaError::MissingCredential {
            var: API_KEY_VAR,
            secrets: paths.secrets_file.display().to_string(),
        }
        .into()),
    }
}
