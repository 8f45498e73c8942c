//! Integration tests for the HTTP probe with mock HTTP servers.

use fleetwatch::monitor::{
    HealthMonitor, HttpProbe, MonitorConfig, Probe, ProbeError, Target, TargetStatus,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn probe() -> HttpProbe {
    HttpProbe::new(Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_http_probe_success_with_json_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "load": 0.35,
            "availability_pct": 99.9
        })))
        .mount(&mock_server)
        .await;

    let target = Target::service("vector-store").with_url(format!("{}/health", mock_server.uri()));
    let report = probe().probe(&target).await.unwrap();

    assert!(!report.error_occurred);
    assert_eq!(report.load, Some(0.35));
    assert_eq!(report.availability_pct, Some(99.9));
}

#[tokio::test]
async fn test_http_probe_plain_body_is_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&mock_server)
        .await;

    let target = Target::service("cache").with_url(format!("{}/healthz", mock_server.uri()));
    let report = probe().probe(&target).await.unwrap();

    assert!(!report.error_occurred);
    assert!(report.load.is_none());
    assert!(report.availability_pct.is_none());
}

#[tokio::test]
async fn test_http_probe_reported_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": true
        })))
        .mount(&mock_server)
        .await;

    let target = Target::model("gpt-4o").with_url(format!("{}/health", mock_server.uri()));
    let report = probe().probe(&target).await.unwrap();
    assert!(report.error_occurred);
}

#[tokio::test]
async fn test_http_probe_server_error_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let target = Target::model("gpt-4o").with_url(format!("{}/health", mock_server.uri()));
    let err = probe().probe(&target).await.unwrap_err();
    assert_eq!(err, ProbeError::HttpStatus(503));
}

#[tokio::test]
async fn test_http_probe_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let probe = HttpProbe::new(Duration::from_millis(100)).unwrap();
    let target = Target::model("gpt-4o").with_url(format!("{}/health", mock_server.uri()));
    let err = probe.probe(&target).await.unwrap_err();
    assert_eq!(err, ProbeError::Timeout(100));
}

#[tokio::test]
async fn test_http_probe_connection_refused() {
    // Port 1 is reserved and not listening
    let target = Target::service("database").with_url("http://127.0.0.1:1/health");
    let err = probe().probe(&target).await.unwrap_err();
    assert!(matches!(err, ProbeError::Connection(_)));
}

#[tokio::test]
async fn test_http_probe_missing_url() {
    let target = Target::service("database");
    let err = probe().probe(&target).await.unwrap_err();
    assert!(err.to_string().contains("no probe URL"));
}

#[tokio::test]
async fn test_monitor_with_http_probe() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = MonitorConfig {
        health_check_timeout_ms: 2000,
        auto_recovery: false,
        ..Default::default()
    };
    let probe = HttpProbe::new(config.probe_timeout()).unwrap();
    let monitor = HealthMonitor::builder(config, Arc::new(probe))
        .target(Target::model("claude-sonnet").with_url(format!("{}/up", mock_server.uri())))
        .target(Target::service("database").with_url(format!("{}/down", mock_server.uri())))
        .build()
        .unwrap();

    let status = monitor.force_check().await;

    assert_eq!(
        status.target("claude-sonnet").unwrap().status,
        TargetStatus::Active
    );
    let database = status.target("database").unwrap();
    assert_eq!(database.status, TargetStatus::Critical);
    assert_eq!(database.last_error.as_deref(), Some("HTTP error: 500"));

    monitor.shutdown().await;
}
