mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use mockito::{Matcher, Server, ServerGuard};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use credmon::calculator::MetricsCalculator;
use credmon::error::MonitorError;
use credmon::metrics::Metrics;
use credmon::models::graph::APPLICATION_SELECT;
use credmon::providers::create_application_source;
use credmon::scan::CredentialScanner;

use common::{body_text, build_app, graph_config, mock_token, request};

fn time_of_scan() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn scanner(server: &ServerGuard, metrics: &Metrics) -> CredentialScanner<Metrics> {
    let source = create_application_source(&graph_config(&server.url())).unwrap();
    CredentialScanner::new(source, metrics.clone(), MetricsCalculator::default())
}

async fn mock_first_page(server: &mut ServerGuard, body: String) -> mockito::Mock {
    server
        .mock("GET", "/v1.0/applications")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("$select".into(), APPLICATION_SELECT.into()),
            Matcher::UrlEncoded("$top".into(), "1".into()),
        ]))
        .match_header("authorization", "Bearer integration-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_second_page(server: &mut ServerGuard, status: usize, body: String) -> mockito::Mock {
    server
        .mock("GET", "/v1.0/applications")
        .match_query(Matcher::UrlEncoded("$skiptoken".into(), "page2".into()))
        .match_header("authorization", "Bearer integration-token")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn first_page_body(server: &ServerGuard) -> String {
    format!(
        r#"{{
            "@odata.nextLink": "{}/v1.0/applications?$skiptoken=page2",
            "value": [{{
                "id": "object-1",
                "appId": "client-1",
                "displayName": "Billing API",
                "keyCredentials": [{{
                    "keyId": "d2c4e1f0-1111-4222-8333-944455556666",
                    "displayName": "CN=billing",
                    "startDateTime": "2024-06-05T12:00:00Z",
                    "endDateTime": "2024-07-05T12:00:00Z",
                    "type": "AsymmetricX509Cert",
                    "usage": "Verify"
                }}],
                "passwordCredentials": [{{
                    "keyId": "a1b2c3d4-0000-4000-8000-00000000000a",
                    "displayName": null,
                    "startDateTime": null,
                    "endDateTime": null
                }}]
            }}]
        }}"#,
        server.url()
    )
}

const SECOND_PAGE: &str = r#"{
    "value": [{
        "id": "object-2",
        "appId": "00000000-0000-0000-0000-000000000002",
        "displayName": null,
        "keyCredentials": [],
        "passwordCredentials": []
    }]
}"#;

#[tokio::test]
async fn test_scan_follows_pages_and_records_gauges() {
    let mut server = Server::new_async().await;
    mock_token(&mut server).await;
    let body = first_page_body(&server);
    let first = mock_first_page(&mut server, body).await;
    let second = mock_second_page(&mut server, 200, SECOND_PAGE.to_string()).await;

    let metrics = Metrics::new().unwrap();
    let summary = scanner(&server, &metrics)
        .scan_at(time_of_scan(), &CancellationToken::new())
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.applications, 2);
    assert_eq!(summary.credentials, 2);
    assert!(!summary.cancelled);

    let text = metrics.render().unwrap();
    let expected = [
        r#"entra_app_secret_count{Application="Billing API",ApplicationId="client-1"} 2"#,
        r#"entra_app_secret_count{Application="00000000-0000-0000-0000-000000000002",ApplicationId="00000000-0000-0000-0000-000000000002"} 0"#,
        r#"entra_app_secret_age_days{Application="Billing API",ApplicationId="client-1",Key="CN=billing",KeyId="d2c4e1f0-1111-4222-8333-944455556666"} 10"#,
        r#"entra_app_secret_expiry_days{Application="Billing API",ApplicationId="client-1",Key="CN=billing",KeyId="d2c4e1f0-1111-4222-8333-944455556666"} 20"#,
        r#"entra_app_secret_age_days{Application="Billing API",ApplicationId="client-1",Key="a1b2c3d4-0000-4000-8000-00000000000a",KeyId="a1b2c3d4-0000-4000-8000-00000000000a"} -1"#,
        r#"entra_app_secret_expiry_days{Application="Billing API",ApplicationId="client-1",Key="a1b2c3d4-0000-4000-8000-00000000000a",KeyId="a1b2c3d4-0000-4000-8000-00000000000a"} 1826"#,
    ];
    for line in expected {
        assert!(text.lines().any(|l| l == line), "missing `{}` in:\n{}", line, text);
    }
}

#[tokio::test]
async fn test_failure_on_second_page_keeps_first_page() {
    let mut server = Server::new_async().await;
    mock_token(&mut server).await;
    let body = first_page_body(&server);
    mock_first_page(&mut server, body).await;
    mock_second_page(
        &mut server,
        503,
        r#"{"error": {"code": "ServiceUnavailable", "message": "Try again later."}}"#.to_string(),
    )
    .await;

    let metrics = Metrics::new().unwrap();
    let result = scanner(&server, &metrics)
        .scan_at(time_of_scan(), &CancellationToken::new())
        .await;

    match result {
        Err(MonitorError::Graph { status, code, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(code, "ServiceUnavailable");
        }
        other => panic!("Expected Graph error, got {:?}", other),
    }
    let text = metrics.render().unwrap();
    assert!(text.contains(r#"ApplicationId="client-1""#));
    assert!(!text.contains("00000000-0000-0000-0000-000000000002"));
}

#[tokio::test]
async fn test_empty_directory_clears_previous_scan() {
    let metrics = Metrics::new().unwrap();

    let mut populated = Server::new_async().await;
    mock_token(&mut populated).await;
    let body = first_page_body(&populated);
    mock_first_page(&mut populated, body).await;
    mock_second_page(&mut populated, 200, SECOND_PAGE.to_string()).await;
    scanner(&populated, &metrics)
        .scan_at(time_of_scan(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(metrics.render().unwrap().contains("entra_app_secret_count{"));

    let mut empty = Server::new_async().await;
    mock_token(&mut empty).await;
    empty
        .mock("GET", "/v1.0/applications")
        .match_query(Matcher::Any)
        .with_status(204)
        .create_async()
        .await;
    let summary = scanner(&empty, &metrics)
        .scan_at(time_of_scan(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.applications, 0);
    assert!(!metrics.render().unwrap().contains("entra_app_secret_count{"));
}

#[tokio::test]
async fn test_unreachable_token_endpoint_keeps_previous_scan() {
    let metrics = Metrics::new().unwrap();

    let mut server = Server::new_async().await;
    mock_token(&mut server).await;
    let body = first_page_body(&server);
    mock_first_page(&mut server, body).await;
    mock_second_page(&mut server, 200, SECOND_PAGE.to_string()).await;
    scanner(&server, &metrics)
        .scan_at(time_of_scan(), &CancellationToken::new())
        .await
        .unwrap();

    let mut broken = Server::new_async().await;
    broken
        .mock("POST", format!("/{}/oauth2/v2.0/token", common::TENANT).as_str())
        .with_status(401)
        .with_body(r#"{"error": "invalid_client"}"#)
        .create_async()
        .await;
    let result = scanner(&broken, &metrics)
        .scan_at(time_of_scan(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(MonitorError::Auth(_))));
    assert!(metrics.render().unwrap().contains(r#"ApplicationId="client-1""#));
}

#[tokio::test]
async fn test_metrics_endpoint_serves_scan_results() {
    let mut server = Server::new_async().await;
    mock_token(&mut server).await;
    let body = first_page_body(&server);
    mock_first_page(&mut server, body).await;
    mock_second_page(&mut server, 200, SECOND_PAGE.to_string()).await;

    let metrics = Metrics::new().unwrap();
    scanner(&server, &metrics)
        .scan_at(time_of_scan(), &CancellationToken::new())
        .await
        .unwrap();

    let response = build_app(metrics)
        .oneshot(request("/metrics", Method::GET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let body = body_text(response).await;
    assert!(body.contains("# TYPE entra_app_secret_expiry_days gauge"));
    assert!(body.contains(r#"entra_app_secret_count{Application="Billing API",ApplicationId="client-1"} 2"#));
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = build_app(Metrics::new().unwrap())
        .oneshot(request("/health", Method::GET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_cancelled_scan_stops_before_fetching() {
    let server = Server::new_async().await;
    let metrics = Metrics::new().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let source = create_application_source(&graph_config(&server.url())).unwrap();
    let summary = CredentialScanner::new(Arc::clone(&source), metrics.clone(), MetricsCalculator::default())
        .scan_at(time_of_scan(), &cancel)
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.pages, 0);
    assert!(!metrics.render().unwrap().contains("entra_app_secret_count{"));
}
