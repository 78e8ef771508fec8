use crate::cli::{RuntimeArgs, resolve_config};
use crate::commands::CommandReport;
use crate::nova::config::ProviderKind;
use crate::nova::credentials::{API_KEY_VAR, lookup_api_key};
use crate::nova::paths::NovaPaths;

pub fn run(paths: &NovaPaths, runtime: &RuntimeArgs) -> CommandReport {
    let mut report = CommandReport::new("status");

    report.detail(format!("nova_home={}", paths.nova_home.display()));
    report.detail(format!(
        "config_file={}{}",
        paths.config_file.display(),
        if paths.config_file.exists() { "" } else { " (absent)" }
    ));
    report.detail(format!("secrets_file={}", paths.secrets_file.display()));

    let cfg = match resolve_config(paths, runtime) {
        Ok(cfg) => cfg,
        Err(err) => {
            report.issue(format!("{err:#}"));
            return report;
        }
    };

    report.detail(format!("provider={}", cfg.provider.kind.label()));
    report.detail(format!("model={}", cfg.provider.model));
    report.detail(format!("temperature={}", cfg.provider.temperature));
    report.detail(format!("show_raw_response={}", cfg.chat.show_raw_response));

    match cfg.provider.kind {
        ProviderKind::Groq => {
            report.detail(format!("base_url={}", cfg.provider.base_url));
            report.detail(format!(
                "request_timeout_secs={}",
                cfg.provider.request_timeout_secs
            ));
            match lookup_api_key(paths) {
                Ok(Some(_)) => report.detail(format!("{API_KEY_VAR} set: true")),
                Ok(None) => report.issue(format!(
                    "{API_KEY_VAR} not found; add it to .env or {}",
                    paths.secrets_file.display()
                )),
                Err(err) => report.issue(format!("{err:#}")),
            }
        }
        ProviderKind::Replay => {
            let path = cfg.provider.replay_path.as_deref().unwrap_or_default();
            report.detail(format!("replay_path={path}"));
            if !std::path::Path::new(path).is_file() {
                report.issue(format!("replay file missing: {path}"));
            }
        }
    }

    report
}
