use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use transfer_scout::app::{router, AppState};
use transfer_scout::config::toml_config::{ParseConfig, SourceConfig};
use transfer_scout::{HttpPageSource, ParseRules, TransferFetcher};

const FIXTURE: &str = include_str!("fixtures/transfer_list.html");

fn app_for(server: &MockServer) -> axum::Router {
    let source = HttpPageSource::new(&SourceConfig {
        url: server.url("/transfers"),
        ..SourceConfig::default()
    })
    .unwrap();
    let rules = ParseRules::from_config(&ParseConfig::default()).unwrap();
    router(Arc::new(AppState::new(TransferFetcher::new(source, rules))))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn serve_fixture(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/transfers");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body(FIXTURE);
        })
        .await
}

#[tokio::test]
async fn test_all_transfers_endpoint() {
    let server = MockServer::start_async().await;
    let page_mock = serve_fixture(&server).await;

    let (status, body) = get(app_for(&server), "/api/transfers").await;

    page_mock.assert_hits_async(1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["source"], server.url("/transfers"));
    assert!(body["updated_at"].is_string());
    assert_eq!(body["counts"]["u21"], 3);
    assert_eq!(body["counts"]["nt"], 3);
    assert_eq!(body["counts"]["total"], 6);
    assert_eq!(body["u21"][0]["htId"], 412345678);
    assert_eq!(body["nt"][0]["name"], "Nikos Ioannou");
}

#[tokio::test]
async fn test_single_team_endpoint() {
    let server = MockServer::start_async().await;
    serve_fixture(&server).await;

    let (status, body) = get(app_for(&server), "/api/transfers/u21").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team"], "u21");
    assert_eq!(body["count"], 3);
    assert!(body["fetchedAt"].is_string());

    let players = body["players"].as_array().unwrap();
    assert_eq!(players.len(), 3);
    assert_eq!(players[0]["country"], "Cyprus");
    assert_eq!(players[0]["askingPrice"], "1 250 000");

    let petros = players.iter().find(|p| p["htId"] == 412345680).unwrap();
    assert!(petros["ageYears"].is_null());
    assert!(petros["ageDays"].is_null());
}

#[tokio::test]
async fn test_team_must_match_exactly() {
    let server = MockServer::start_async().await;
    let page_mock = serve_fixture(&server).await;

    for uri in ["/api/transfers/NT", "/api/transfers/%20nt"] {
        let (status, body) = get(app_for(&server), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string());
    }
    page_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_invalid_team_is_bad_request_without_fetch() {
    let server = MockServer::start_async().await;
    let page_mock = serve_fixture(&server).await;

    let (status, body) = get(app_for(&server), "/api/transfers/xyz").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("xyz"));
    page_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_upstream_503_is_bad_gateway() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/transfers");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let (status, body) = get(app_for(&server), "/api/transfers/nt").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to fetch the transfer list");
    assert_eq!(body["details"], "Upstream responded with HTTP 503");

    let raw = body.to_string();
    assert!(!raw.contains("panicked"));
    assert!(!raw.contains("backtrace"));
    assert!(!raw.contains(".rs:"));
}

#[tokio::test]
async fn test_upstream_failure_on_combined_endpoint() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/transfers");
            then.status(503);
        })
        .await;

    let (status, body) = get(app_for(&server), "/api/transfers").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());
    assert!(body.get("u21").is_none());
}

#[tokio::test]
async fn test_empty_upstream_document_is_internal_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/transfers");
            then.status(200).body("");
        })
        .await;

    let (status, body) = get(app_for(&server), "/api/transfers/u21").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start_async().await;

    let (status, body) = get(app_for(&server), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
