//! HTTP API exercised through the router

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pulse_aggregator::aggregator::{Aggregator, AggregatorConfig};
use pulse_aggregator::config::Settings;
use pulse_aggregator::sources::mock::MockSource;
use pulse_aggregator::sources::SourceRegistry;
use pulse_aggregator::summary::SimpleSummarizer;
use pulse_aggregator::web::{create_router, serve_with_grace, AppState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

fn app_with(registry: SourceRegistry) -> Router {
    let aggregator = Aggregator::new(
        Arc::new(registry),
        Arc::new(SimpleSummarizer::new()),
        AggregatorConfig::default(),
    );
    create_router(AppState::new(Settings::default(), aggregator))
}

fn app() -> Router {
    let registry = SourceRegistry::new();
    registry.register(Arc::new(MockSource::new()));
    app_with(registry)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(&app(), "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["time"].is_string());
}

#[tokio::test]
async fn search_returns_aggregated_response() {
    let app = app();

    let (status, body) = get(&app, "/v1/search?q=brand&limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "brand");
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["metadata"]["cached"], false);
    assert!(body["metadata"]["took"].is_u64());
    assert_eq!(body["metadata"]["source_outcomes"][0]["name"], "mock");

    let (_, cached) = get(&app, "/v1/search?q=BRAND&limit=3").await;
    assert_eq!(cached["metadata"]["cached"], true);

    let (_, fresh) = get(&app, "/v1/search?q=brand&limit=3&fresh=TRUE").await;
    assert_eq!(fresh["metadata"]["cached"], false);
}

#[tokio::test]
async fn search_requires_query() {
    let (status, body) = get(&app(), "/v1/search?q=%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("`q`"));
}

#[tokio::test]
async fn search_with_unknown_providers_is_unavailable() {
    let (status, body) = get(&app(), "/v1/search?q=brand&providers=weibo,douyin").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("no sources"));
}

#[tokio::test]
async fn search_on_empty_registry_is_unavailable() {
    let (status, _) = get(&app_with(SourceRegistry::new()), "/v1/search?q=brand").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn history_lists_recent_queries() {
    let app = app();
    get(&app, "/v1/search?q=brand").await;
    get(&app, "/v1/search?q=data").await;
    get(&app, "/v1/search?q=trends").await;

    let (status, body) = get(&app, "/v1/history?limit=2").await;
    assert_eq!(status, StatusCode::OK);

    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["query"], "trends");
    assert_eq!(records[1]["query"], "data");
    assert_eq!(records[0]["sources"][0], "mock");
}

#[tokio::test]
async fn providers_are_listed_sorted() {
    let registry = SourceRegistry::new();
    registry.register(Arc::new(MockSource::with_items("zhihu", vec![])));
    registry.register(Arc::new(MockSource::with_items("wechat", vec![])));

    let (status, body) = get(&app_with(registry), "/v1/providers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["providers"], serde_json::json!(["wechat", "zhihu"]));
}

#[tokio::test]
async fn stats_track_searches() {
    let app = app();
    get(&app, "/v1/search?q=brand").await;
    get(&app, "/v1/search?q=brand").await;

    let (status, body) = get(&app, "/v1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_searches"], 2);
    assert_eq!(body["cache_hits"], 1);
    assert_eq!(body["sources"]["mock"]["calls"], 1);
}

#[tokio::test]
async fn shutdown_drain_is_bounded() {
    let app = Router::new().route(
        "/slow",
        axum::routing::get(|| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "done"
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve_with_grace(
        listener,
        app,
        async move {
            let _ = stop_rx.await;
        },
        Duration::from_millis(200),
    ));

    // keep one request in flight past the grace period
    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"GET /slow HTTP/1.1\r\nhost: localhost\r\n\r\n")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    stop_tx.send(()).unwrap();

    let stopped = tokio::time::timeout(Duration::from_secs(5), server).await;
    assert!(matches!(stopped, Ok(Ok(Ok(())))));
}
