//! End-to-end runs of the `ovupload` binary against mock OneVizion and
//! OpenAI servers.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ovupload_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ovupload"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn write_settings(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        serde_json::to_string_pretty(&json!({
            "ovUrl": "https://trial.onevizion.test/",
            "ovAccessKey": "access",
            "ovSecretKey": "secret",
            "openAIApiKey": "sk-test",
            "trackorType": "Document",
            "fileField": "DOC_FILE",
            "fileIdField": "DOC_FILE_ID",
            "loadCheckboxField": "DOC_LOAD"
        }))
        .expect("json"),
    )
    .expect("write settings");
    path
}

async fn run_against(ov: &MockServer, openai: &MockServer, settings: &Path, extra: &[&str]) -> Output {
    let mut cmd = ovupload_cmd();
    cmd.arg("run")
        .arg("--settings")
        .arg(settings)
        .arg("--ov-base-url")
        .arg(ov.uri())
        .arg("--openai-api-url")
        .arg(format!("{}/v1", openai.uri()))
        .args(extra);
    tokio::task::spawn_blocking(move || cmd.output().expect("run ovupload"))
        .await
        .expect("join")
}

async fn mount_pending(ov: &MockServer, rows: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v3/trackor_types/Document/trackors"))
        .and(query_param("fields", "DOC_FILE"))
        .and(query_param("DOC_LOAD", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .expect(1)
        .mount(ov)
        .await;
}

// ---------------------------------------------------------------------------
// 1. check-settings
// ---------------------------------------------------------------------------

#[test]
fn check_settings_prints_normalized_host() {
    let dir = TempDir::new().expect("tempdir");
    let settings = write_settings(&dir);

    ovupload_cmd()
        .arg("check-settings")
        .arg("--settings")
        .arg(&settings)
        .assert()
        .success()
        .stdout(contains("trial.onevizion.test"))
        .stdout(contains("Document"))
        .stdout(contains("sk-test").not());
}

#[test]
fn check_settings_missing_file_fails() {
    let dir = TempDir::new().expect("tempdir");

    ovupload_cmd()
        .arg("check-settings")
        .arg("--settings")
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(contains("failed to load settings"));
}

// ---------------------------------------------------------------------------
// 2. run
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_uploads_and_writes_back_file_id() {
    let dir = TempDir::new().expect("tempdir");
    let settings = write_settings(&dir);
    let ov = MockServer::start().await;
    let openai = MockServer::start().await;

    mount_pending(
        &ov,
        json!([
            {"TRACKOR_ID": 7, "DOC_FILE": {"data": "hello", "file_name": "a.txt"}},
            {"TRACKOR_ID": 8, "DOC_FILE": null}
        ]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/api/v3/trackors/7"))
        .and(body_json(json!({"DOC_LOAD": "0", "DOC_FILE_ID": "file_abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"TRACKOR_ID": 7})))
        .expect(1)
        .mount(&ov)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/files"))
        .and(body_string_contains("filename=\"a.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file_abc"})))
        .expect(1)
        .mount(&openai)
        .await;

    let output = run_against(&ov, &openai, &settings, &["--json"]).await;
    assert!(
        output.status.success(),
        "command failed: status={} stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr),
    );

    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["dry_run"], json!(false));
    assert_eq!(
        report["outcomes"],
        json!([
            {"status": "uploaded", "trackor_id": 7, "file_id": "file_abc"},
            {"status": "skipped", "trackor_id": 8}
        ])
    );
}

#[tokio::test]
async fn run_dry_run_touches_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let settings = write_settings(&dir);
    let ov = MockServer::start().await;
    let openai = MockServer::start().await;

    mount_pending(
        &ov,
        json!([{"TRACKOR_ID": 7, "DOC_FILE": {"data": "hello", "file_name": "a.txt"}}]),
    )
    .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ov)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "never"})))
        .expect(0)
        .mount(&openai)
        .await;

    let output = run_against(&ov, &openai, &settings, &["--dry-run"]).await;
    assert!(output.status.success(), "stderr={}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("[dry-run]"), "missing dry-run prefix: {stdout}");
    assert!(stdout.contains("would upload"), "missing outcome row: {stdout}");
}

#[tokio::test]
async fn run_fails_when_fetch_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let settings = write_settings(&dir);
    let ov = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid token"))
        .mount(&ov)
        .await;

    let output = run_against(&ov, &openai, &settings, &[]).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to fetch trackors"), "stderr={stderr}");
    assert!(stderr.contains("Invalid token"), "stderr={stderr}");
}

#[tokio::test]
async fn run_with_ihub_parameters_posts_integration_log() {
    let dir = TempDir::new().expect("tempdir");
    let settings = write_settings(&dir);
    let ihub = dir.path().join("ihub_parameters.json");
    fs::write(&ihub, r#"{"processId": 4242, "logLevel": "Info"}"#).expect("write ihub");
    let ov = MockServer::start().await;
    let openai = MockServer::start().await;

    mount_pending(&ov, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/v3/integrations/runs/4242/logs"))
        .and(body_json(json!({
            "message": "Module is started",
            "description": "",
            "log_level_name": "Info"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ov)
        .await;

    let ihub_arg = ihub.to_string_lossy().into_owned();
    let output = run_against(&ov, &openai, &settings, &["--ihub-parameters", &ihub_arg]).await;
    assert!(output.status.success(), "stderr={}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No trackors flagged for upload."));
}
