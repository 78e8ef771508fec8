use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

use crate::commands::CommandReport;
use crate::nova::session::ChatSettings;

pub const RAW_VIEW_HEADING: &str = "Raw model response (redacted):";

/// Spinner shown while a provider call blocks. Hidden when stderr is not a terminal.
pub fn waiting_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_message("...");
    if let Ok(template) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(template);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_reply(reply: &str, failed: bool, labelled: bool) {
    let body = if failed {
        style(reply).red().to_string()
    } else {
        reply.to_string()
    };
    if labelled {
        println!("{} {}", style("assistant>").green().bold(), body);
    } else {
        println!("{body}");
    }
}

pub fn print_raw_view(view: &Value) -> Result<()> {
    println!("{}", style(RAW_VIEW_HEADING).dim());
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

pub fn print_settings(settings: &ChatSettings) {
    println!(
        "model={} temperature={} show_raw_response={}",
        settings.model, settings.temperature, settings.show_raw_response
    );
}

pub fn print_report(report: &CommandReport) {
    let verdict = if report.ok {
        style("ok").green()
    } else {
        style("issues").yellow()
    };
    println!("{}: {}", report.command, verdict);
    for detail in &report.details {
        println!("  {detail}");
    }
    for issue in &report.issues {
        println!("  {} {issue}", style("!").yellow());
    }
}
