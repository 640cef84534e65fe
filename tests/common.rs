#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use mockito::ServerGuard;

use credmon::config::GraphConfig;
use credmon::metrics::Metrics;
use credmon::routes::create_router;
use credmon::state::AppState;

pub const TENANT: &str = "contoso";

pub fn build_app(metrics: Metrics) -> Router {
    create_router(AppState { metrics })
}

pub fn request(path: &str, method: Method) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

/// Graph config pointing both the authority and Graph at the mock server.
pub fn graph_config(url: &str) -> GraphConfig {
    GraphConfig {
        tenant_id: TENANT.to_string(),
        client_id: "monitor-client".to_string(),
        client_secret: "monitor-secret".to_string(),
        authority_url: url.to_string(),
        graph_url: url.to_string(),
        api_version: "v1.0".to_string(),
        page_size: Some(1),
        timeout_in_ms: 5_000,
    }
}

pub async fn mock_token(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", format!("/{}/oauth2/v2.0/token", TENANT).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token_type": "Bearer", "expires_in": 3599, "access_token": "integration-token"}"#)
        .create_async()
        .await
}
