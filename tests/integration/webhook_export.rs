//! Webhook export against a local mock endpoint.

use std::sync::Arc;
use std::time::Duration;

use debug_recorder::error::ExportError;
use debug_recorder::telemetry::{Context, LogLevel, TelemetryRecorder, WebhookExporter};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn exporter_for(server: &MockServer) -> WebhookExporter {
    WebhookExporter::new(&format!("{}/hook", server.uri()), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn record_posts_serialized_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let exporter = exporter_for(&server);
    let recorder = TelemetryRecorder::builder()
        .exporter(Arc::new(exporter.clone()))
        .build();
    let mut context = Context::new();
    context.insert("plan".to_string(), json!("pro"));
    recorder.record(LogLevel::Error, "Payment: card declined", Some(context));

    assert!(exporter.drain(Duration::from_secs(5)).await);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let expected = serde_json::to_value(&recorder.recent_logs(1)[0]).unwrap();
    assert_eq!(body, expected);
    assert_eq!(body["level"], "error");
    assert_eq!(body["context"]["plan"], "pro");
}

#[tokio::test]
async fn server_errors_are_absorbed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let exporter = exporter_for(&server);
    let recorder = TelemetryRecorder::builder()
        .exporter(Arc::new(exporter.clone()))
        .build();
    recorder.info("first");
    recorder.info("second");

    assert!(exporter.drain(Duration::from_secs(5)).await);
    assert_eq!(recorder.log_count(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    let entry = recorder.recent_logs(1).remove(0);
    let err = exporter.send(&entry).await.unwrap_err();
    assert!(matches!(err, ExportError::Status(500)), "unexpected error: {}", err);
}

#[tokio::test]
async fn each_record_is_sent_at_most_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let exporter = exporter_for(&server);
    let recorder = TelemetryRecorder::builder()
        .exporter(Arc::new(exporter.clone()))
        .build();
    recorder.warn("Flaky: upstream");

    assert!(exporter.drain(Duration::from_secs(5)).await);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_never_reaches_the_caller() {
    let exporter =
        WebhookExporter::new("http://127.0.0.1:9/hook", Duration::from_millis(500)).unwrap();
    let recorder = TelemetryRecorder::builder()
        .exporter(Arc::new(exporter.clone()))
        .build();
    recorder.error("Network error: offline");

    assert!(exporter.drain(Duration::from_secs(5)).await);
    assert_eq!(recorder.error_summary().error_types["Network error"], 1);
}
