use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct NovaPaths {
    pub nova_home: PathBuf,
    pub config_file: PathBuf,
    pub secrets_file: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_path(var: &str) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => None,
    }
}

pub fn resolve_paths() -> Result<NovaPaths> {
    let nova_home = match env_path("NOVA_HOME") {
        Some(path) => path,
        None => required_home_dir()?.join(".mindflow"),
    };
    let config_file = env_path("NOVA_CONFIG_PATH").unwrap_or_else(|| nova_home.join("nova.toml"));
    let secrets_file =
        env_path("NOVA_SECRETS_PATH").unwrap_or_else(|| nova_home.join("secrets.toml"));

    Ok(NovaPaths {
        nova_home,
        config_file,
        secrets_file,
    })
}
