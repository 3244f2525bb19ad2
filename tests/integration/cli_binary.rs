//! Runs the `debug-recorder` binary end to end.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVENTS: &str = r#"{"kind":"log","level":"info","message":"Page loaded","context":{"path":"/"}}
{"kind":"log","level":"error","message":"Auth: invalid credentials"}
{"kind":"metric","name":"signin.submit","duration":120}
{"kind":"log","level":"error","message":"Auth: rate limited"}
this line is not json
"#;

fn write_events(dir: &TempDir) -> std::path::PathBuf {
    let input = dir.path().join("events.jsonl");
    fs::write(&input, EVENTS).unwrap();
    input
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_debug-recorder"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn report_command_prints_report() {
    let dir = TempDir::new().unwrap();
    let input = write_events(&dir);
    let output = run(&["--quiet", "report", "--input", input.to_str().unwrap()]);

    assert!(
        output.status.success(),
        "report should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Debug Report"));
    assert!(stdout.contains("- Total Errors: 2"));
    assert!(stdout.contains("\"Auth\": 2"));
    assert!(stdout.contains("- signin.submit: 120ms"));
}

#[test]
fn logs_command_with_non_positive_limit_prints_empty_list() {
    let dir = TempDir::new().unwrap();
    let input = write_events(&dir);
    let output = run(&[
        "--quiet",
        "logs",
        "--limit",
        "-5",
        "--input",
        input.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let logs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(logs, serde_json::json!([]));
}

#[test]
fn invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("recorder.toml");
    fs::write(&config, "max_logs = 0\n").unwrap();
    let input = write_events(&dir);

    let output = run(&[
        "--config",
        config.to_str().unwrap(),
        "summary",
        "--input",
        input.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("max_logs"));
}

#[tokio::test(flavor = "multi_thread")]
async fn webhook_flag_delivers_each_log_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/debug"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_events(&dir);
    let webhook = format!("{}/debug", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run(&[
            "--quiet",
            "--webhook",
            webhook.as_str(),
            "summary",
            "--input",
            input.to_str().unwrap(),
        ])
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "summary should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["totalErrors"], 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
