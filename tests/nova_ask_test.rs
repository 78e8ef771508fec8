use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PLACEHOLDER: &str = "[Model returned a complex object — textual output extracted.]";

fn nova(home: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nova");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("NOVA_HOME", home.join("nova"))
        .env_remove("GROQ_API_KEY")
        .env_remove("NOVA_PROVIDER")
        .env_remove("NOVA_MODEL")
        .env_remove("NOVA_TEMPERATURE")
        .env_remove("NOVA_BASE_URL")
        .env_remove("NOVA_SHOW_RAW")
        .env_remove("NOVA_REPLAY_PATH")
        .env_remove("NOVA_CONFIG_PATH")
        .env_remove("NOVA_SECRETS_PATH");
    cmd
}

#[test]
fn ask_prints_first_generation_candidate() {
    let tmp = tempdir().expect("tempdir");
    let reply = tmp.path().join("reply.json");
    fs::write(&reply, r#"{"generations": [[{"text": "hi"}], [{"text": "no"}]]}"#)
        .expect("write reply");

    nova(tmp.path())
        .arg("--replay")
        .arg(&reply)
        .args(["ask", "Hi"])
        .assert()
        .success()
        .stdout("hi\n");
}

#[test]
fn ask_hides_usage_dumps_and_redacts_raw_view() {
    let tmp = tempdir().expect("tempdir");
    let reply = tmp.path().join("reply.json");
    fs::write(
        &reply,
        r#"{"choices": [], "usage": {"prompt_tokens": 987654}, "meta": {"auth_token": "s3cr3t"}}"#,
    )
    .expect("write reply");

    nova(tmp.path())
        .arg("--replay")
        .arg(&reply)
        .args(["ask", "--show-raw", "Hi"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(PLACEHOLDER))
        .stdout(predicate::str::contains("Raw model response (redacted):"))
        .stdout(predicate::str::contains("\"usage\": \"<REDACTED>\""))
        .stdout(predicate::str::contains("\"auth_token\": \"<REDACTED>\""))
        .stdout(predicate::str::contains("987654").not())
        .stdout(predicate::str::contains("s3cr3t").not());
}

#[test]
fn ask_reports_provider_failure_as_error_reply() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("missing.json");

    nova(tmp.path())
        .arg("--replay")
        .arg(&missing)
        .args(["ask", "Hi"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Error: failed to read replay file"));
}

#[test]
fn ask_turns_unreachable_endpoint_into_error_reply() {
    let tmp = tempdir().expect("tempdir");

    nova(tmp.path())
        .env("GROQ_API_KEY", "gsk_test")
        .env("NOVA_BASE_URL", "http://127.0.0.1:9/openai/v1")
        .env("NOVA_REQUEST_TIMEOUT_SECS", "5")
        .args(["ask", "Hi"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Error: "));
}

#[test]
fn missing_credential_is_fatal() {
    let tmp = tempdir().expect("tempdir");

    nova(tmp.path())
        .args(["ask", "Hi"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GROQ_API_KEY not found"));
}

#[test]
fn secrets_file_satisfies_the_credential_check() {
    let tmp = tempdir().expect("tempdir");
    let nova_home = tmp.path().join("nova");
    fs::create_dir_all(&nova_home).expect("mkdir nova home");
    fs::write(nova_home.join("secrets.toml"), "GROQ_API_KEY = \"gsk_file\"\n")
        .expect("write secrets");

    nova(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("GROQ_API_KEY set: true"))
        .stdout(predicate::str::contains("gsk_file").not());
}

#[test]
fn out_of_range_temperature_is_rejected() {
    let tmp = tempdir().expect("tempdir");
    let reply = tmp.path().join("reply.json");
    fs::write(&reply, "\"ok\"").expect("write reply");

    nova(tmp.path())
        .arg("--replay")
        .arg(&reply)
        .args(["--temperature", "1.5", "ask", "Hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("temperature"));
}

#[test]
fn config_file_settings_are_reported_by_status() {
    let tmp = tempdir().expect("tempdir");
    let nova_home = tmp.path().join("nova");
    fs::create_dir_all(&nova_home).expect("mkdir nova home");
    let reply = tmp.path().join("reply.json");
    fs::write(&reply, "\"ok\"").expect("write reply");
    fs::write(
        nova_home.join("nova.toml"),
        format!(
            "[provider]\nkind = \"replay\"\nmodel = \"llama-3.1-8b-instant\"\nreplay_path = {:?}\n",
            reply.to_string_lossy()
        ),
    )
    .expect("write config");

    nova(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("status: ok"))
        .stdout(predicate::str::contains("provider=replay"))
        .stdout(predicate::str::contains("model=llama-3.1-8b-instant"));
}
