use anyhow::Result;

use crate::cli::{RuntimeArgs, resolve_config};
use crate::commands::render::{print_raw_view, print_reply, waiting_spinner};
use crate::nova::paths::NovaPaths;
use crate::nova::session::Session;
use crate::provider::build_provider;

pub fn run(paths: &NovaPaths, runtime: &RuntimeArgs, prompt: &str) -> Result<()> {
    let cfg = resolve_config(paths, runtime)?;
    let provider = build_provider(&cfg.provider, paths)?;
    let mut session = Session::from_config(&cfg);

    let spinner = waiting_spinner();
    let outcome = session.run_turn(provider.as_ref(), prompt);
    spinner.finish_and_clear();

    let Some(outcome) = outcome else {
        anyhow::bail!("prompt is empty");
    };
    print_reply(&outcome.reply, outcome.failed, false);
    if let Some(view) = &outcome.raw_view {
        print_raw_view(view)?;
    }
    Ok(())
}
