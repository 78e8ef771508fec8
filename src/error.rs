use thiserror::Error;

#[derive(Debug, Error)]
pub enum NovaError {
    #[error("{var} not found. Add it to .env or {secrets}")]
    MissingCredential { var: &'static str, secrets: String },
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
    #[error("provider call failed: {0}")]
    ProviderInvocation(String),
}
