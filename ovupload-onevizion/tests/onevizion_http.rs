//! Trackor client and integration log against a mock OneVizion server.
//!
//! ureq is blocking, so every client call runs on `spawn_blocking` while the
//! mock server is driven by the test runtime.

use ovupload_core::{
    AccessParameters, FieldMap, Filters, LogError, LogLevel, ModuleLog, TrackorConnector,
    TrackorId, TrackorStore, TrackorType,
};
use ovupload_onevizion::{IntegrationLog, OneVizionConnector, TrackorClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn access() -> AccessParameters {
    AccessParameters::normalize("https://unused.onevizion.test/", "access", "secret")
}

fn client(server: &MockServer) -> TrackorClient {
    OneVizionConnector::new(&access())
        .with_base_url(server.uri())
        .configure(&TrackorType::from("Document"))
}

fn pending_filter() -> Filters {
    Filters::from([("DOC_LOAD".to_string(), "1".to_string())])
}

// ---------------------------------------------------------------------------
// 1. Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn read_sends_fields_filters_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/trackor_types/Document/trackors"))
        .and(query_param("fields", "DOC_FILE"))
        .and(query_param("DOC_LOAD", "1"))
        .and(header("Authorization", "Bearer access:secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"TRACKOR_ID": 7, "DOC_FILE": {"data": "hello", "file_name": "a.txt"}},
            {"TRACKOR_ID": 8, "DOC_FILE": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let rows = tokio::task::spawn_blocking(move || {
        client.read_by_filters(&["DOC_FILE".to_string()], &pending_filter())
    })
    .await
    .expect("join")
    .expect("read");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, TrackorId(7));
    assert_eq!(
        rows[0].file("DOC_FILE").expect("file").expect("present").data,
        "hello"
    );
    assert_eq!(rows[1].file("DOC_FILE").expect("file"), None);
}

#[tokio::test]
async fn read_error_status_becomes_module_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Access denied"))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = tokio::task::spawn_blocking(move || {
        client.read_by_filters(&["DOC_FILE".to_string()], &pending_filter())
    })
    .await
    .expect("join")
    .unwrap_err();

    assert_eq!(err.message, "Failed to get trackors");
    assert!(err.details.contains("HTTP 403"), "got: {}", err.details);
    assert!(err.details.contains("Access denied"), "got: {}", err.details);
    assert!(err.details.contains("DOC_FILE"), "fields missing: {}", err.details);
    assert!(err.details.contains("DOC_LOAD"), "filters missing: {}", err.details);
    assert!(!err.details.contains("secret"), "token leaked: {}", err.details);
}

#[tokio::test]
async fn read_rows_without_trackor_id_fail_whole_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"TRACKOR_ID": 1, "DOC_FILE": null},
            {"DOC_FILE": null}
        ])))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = tokio::task::spawn_blocking(move || {
        client.read_by_filters(&["DOC_FILE".to_string()], &pending_filter())
    })
    .await
    .expect("join")
    .unwrap_err();

    assert_eq!(err.message, "Failed to get trackors");
    assert!(err.details.contains("invalid response body"));
}

#[test]
fn read_transport_failure_becomes_module_error() {
    let client = OneVizionConnector::new(&access())
        .with_base_url("http://127.0.0.1:9")
        .configure(&TrackorType::from("Document"));

    let err = client
        .read_by_filters(&["DOC_FILE".to_string()], &pending_filter())
        .unwrap_err();
    assert_eq!(err.message, "Failed to get trackors");
}

// ---------------------------------------------------------------------------
// 2. Update
// ---------------------------------------------------------------------------

fn update_fields() -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("DOC_LOAD".into(), json!("0"));
    fields.insert("DOC_FILE_ID".into(), json!("file_abc"));
    fields
}

#[tokio::test]
async fn update_puts_fields_and_returns_echo() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v3/trackors/7"))
        .and(header("Authorization", "Bearer access:secret"))
        .and(body_json(json!({"DOC_LOAD": "0", "DOC_FILE_ID": "file_abc"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"TRACKOR_ID": 7, "DOC_FILE_ID": "file_abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let echo = tokio::task::spawn_blocking(move || client.update_by_id(TrackorId(7), &update_fields()))
        .await
        .expect("join")
        .expect("update");

    assert_eq!(echo["TRACKOR_ID"], json!(7));
}

#[tokio::test]
async fn update_error_carries_id_and_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("field is locked"))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = tokio::task::spawn_blocking(move || client.update_by_id(TrackorId(9), &update_fields()))
        .await
        .expect("join")
        .unwrap_err();

    assert_eq!(err.message, "Failed to update trackor fields");
    assert!(err.details.contains("trackor_id=9"), "got: {}", err.details);
    assert!(err.details.contains("file_abc"), "got: {}", err.details);
    assert!(err.details.contains("field is locked"), "got: {}", err.details);
}

#[tokio::test]
async fn update_with_empty_body_returns_null() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client(&server);
    let echo = tokio::task::spawn_blocking(move || client.update_by_id(TrackorId(1), &update_fields()))
        .await
        .expect("join")
        .expect("update");
    assert!(echo.is_null());
}

// ---------------------------------------------------------------------------
// 3. Integration log
// ---------------------------------------------------------------------------

#[tokio::test]
async fn integration_log_posts_events_at_or_above_threshold() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/integrations/runs/1001/logs"))
        .and(header("Authorization", "Bearer access:secret"))
        .and(body_json(json!({
            "message": "The file has been successfully uploaded",
            "description": "trackor_id=7, file_id=file_abc",
            "log_level_name": "Info"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let log = IntegrationLog::new(&access(), 1001, LogLevel::Info).with_base_url(server.uri());
    tokio::task::spawn_blocking(move || {
        log.add(
            LogLevel::Info,
            "The file has been successfully uploaded",
            "trackor_id=7, file_id=file_abc",
        )?;
        log.add(LogLevel::Debug, "not sent", "")
    })
    .await
    .expect("join")
    .expect("log");
}

#[tokio::test]
async fn integration_log_reports_rejected_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such run"))
        .mount(&server)
        .await;

    let log = IntegrationLog::new(&access(), 5, LogLevel::Debug).with_base_url(server.uri());
    let err = tokio::task::spawn_blocking(move || log.add(LogLevel::Error, "boom", ""))
        .await
        .expect("join")
        .unwrap_err();

    assert_eq!(
        err,
        LogError::Status {
            status: 404,
            body: "no such run".into()
        }
    );
}
