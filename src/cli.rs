use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;
use crate::error::NovaError;
use crate::nova::config::{NovaConfig, ProviderKind, load_config};
use crate::nova::paths::{NovaPaths, resolve_paths};

#[derive(Parser, Debug)]
#[command(
    name = "nova",
    version,
    about = "MindFlow Nova: chat with a hosted LLM from the terminal",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RuntimeArgs {
    /// Provider for this run: groq or replay
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model name for this run
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Sampling temperature between 0.0 and 1.0
    #[arg(long, global = true)]
    pub temperature: Option<f64>,

    /// Show the redacted raw provider response after each reply
    #[arg(long = "show-raw", global = true)]
    pub show_raw: bool,

    /// Reply with the contents of this file instead of calling the provider
    #[arg(long, global = true, value_name = "PATH")]
    pub replay: Option<String>,

    /// System prompt sent ahead of the conversation
    #[arg(long = "system-prompt", global = true)]
    pub system_prompt: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat (default)
    Chat,

    /// Send one message and print the reply
    Ask {
        #[arg(required = true)]
        prompt: Vec<String>,
    },

    /// Show resolved settings and credential presence
    Status,
}

impl RuntimeArgs {
    pub fn apply(&self, cfg: &mut NovaConfig) -> Result<()> {
        if let Some(raw) = &self.provider {
            cfg.provider.kind = ProviderKind::parse(raw).ok_or_else(|| {
                NovaError::InvalidSetting(format!("unknown provider `{raw}`; use groq or replay"))
            })?;
        }
        if let Some(path) = &self.replay {
            cfg.provider.replay_path = Some(path.clone());
            if self.provider.is_none() {
                cfg.provider.kind = ProviderKind::Replay;
            }
        }
        if let Some(model) = &self.model {
            cfg.provider.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            cfg.provider.temperature = temperature;
        }
        if self.show_raw {
            cfg.chat.show_raw_response = true;
        }
        if let Some(prompt) = &self.system_prompt {
            cfg.chat.system_prompt = prompt.clone();
        }
        Ok(())
    }
}

pub fn resolve_config(paths: &NovaPaths, runtime: &RuntimeArgs) -> Result<NovaConfig> {
    load_config(paths, |cfg| runtime.apply(cfg))
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = resolve_paths()?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => commands::chat::run(&paths, &cli.runtime),
        Command::Ask { prompt } => commands::ask::run(&paths, &cli.runtime, &prompt.join(" ")),
        Command::Status => {
            let report = commands::status::run(&paths, &cli.runtime);
            commands::render::print_report(&report);
            Ok(())
        }
    }
}
