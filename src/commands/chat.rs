use anyhow::Result;
use console::style;
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, StdinLock};

use crate::cli::{RuntimeArgs, resolve_config};
use crate::commands::render::{
    print_raw_view, print_reply, print_settings, waiting_spinner,
};
use crate::nova::paths::NovaPaths;
use crate::nova::session::Session;
use crate::provider::{ChatProvider, build_provider};

const HELP: &str = "\
/clear           clear the conversation
/raw             toggle the redacted raw response view
/temp <0..1>     set the sampling temperature
/model <name>    set the model name
/settings        show the current settings
/exit            leave (also /quit or end of input)";

#[derive(Debug, Clone, PartialEq)]
enum ReplInput {
    Message(String),
    Clear,
    ToggleRaw,
    Temperature(String),
    Model(String),
    Settings,
    Help,
    Exit,
    Unknown(String),
}

fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return ReplInput::Message(line.trim_end_matches(['\r', '\n']).to_string());
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name.to_ascii_lowercase().as_str() {
        "clear" => ReplInput::Clear,
        "raw" => ReplInput::ToggleRaw,
        "temp" | "temperature" => ReplInput::Temperature(arg.to_string()),
        "model" => ReplInput::Model(arg.to_string()),
        "settings" => ReplInput::Settings,
        "help" | "?" => ReplInput::Help,
        "exit" | "quit" => ReplInput::Exit,
        _ => ReplInput::Unknown(trimmed.to_string()),
    }
}

enum LineSource {
    Terminal,
    Piped(StdinLock<'static>),
}

impl LineSource {
    fn detect() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            LineSource::Terminal
        } else {
            LineSource::Piped(stdin.lock())
        }
    }

    /// `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>> {
        match self {
            LineSource::Terminal => {
                match Input::<String>::new()
                    .with_prompt("You")
                    .allow_empty(true)
                    .interact_text()
                {
                    Ok(line) => Ok(Some(line)),
                    Err(dialoguer::Error::IO(err))
                        if matches!(
                            err.kind(),
                            io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted
                        ) =>
                    {
                        Ok(None)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            LineSource::Piped(lock) => {
                let mut line = String::new();
                if lock.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                Ok(Some(line))
            }
        }
    }
}

fn send(session: &mut Session, provider: &dyn ChatProvider, text: &str) -> Result<()> {
    let spinner = waiting_spinner();
    let outcome = session.run_turn(provider, text);
    spinner.finish_and_clear();

    if let Some(outcome) = outcome {
        print_reply(&outcome.reply, outcome.failed, true);
        if let Some(view) = &outcome.raw_view {
            print_raw_view(view)?;
        }
    }
    Ok(())
}

fn notice(text: &str) {
    println!("{}", style(text).yellow());
}

pub fn run(paths: &NovaPaths, runtime: &RuntimeArgs) -> Result<()> {
    let cfg = resolve_config(paths, runtime)?;
    let provider = build_provider(&cfg.provider, paths)?;
    let mut session = Session::from_config(&cfg);

    println!(
        "{} {}",
        style("MindFlow Nova").cyan().bold(),
        style("(/help for commands)").dim()
    );
    print_settings(&session.settings);

    let mut source = LineSource::detect();
    while let Some(line) = source.next_line()? {
        match parse_input(&line) {
            ReplInput::Message(text) => send(&mut session, provider.as_ref(), &text)?,
            ReplInput::Clear => {
                session.clear();
                notice("conversation cleared");
            }
            ReplInput::ToggleRaw => {
                session.settings.show_raw_response = !session.settings.show_raw_response;
                print_settings(&session.settings);
                if session.settings.show_raw_response
                    && let Some(view) = session.last_raw_view()
                {
                    print_raw_view(&view)?;
                }
            }
            ReplInput::Temperature(raw) => match raw.parse::<f64>() {
                Ok(value) => match session.settings.set_temperature(value) {
                    Ok(()) => print_settings(&session.settings),
                    Err(err) => notice(&err.to_string()),
                },
                Err(_) => notice("usage: /temp <number between 0.0 and 1.0>"),
            },
            ReplInput::Model(name) => match session.settings.set_model(&name) {
                Ok(()) => print_settings(&session.settings),
                Err(err) => notice(&err.to_string()),
            },
            ReplInput::Settings => print_settings(&session.settings),
            ReplInput::Help => println!("{HELP}"),
            ReplInput::Exit => break,
            ReplInput::Unknown(cmd) => notice(&format!("unknown command `{cmd}`; try /help")),
        }
    }

    tracing::debug!(turns = session.history().len() / 2, "chat ended");
    Ok(())
}
