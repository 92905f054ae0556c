//! HTTP request handlers

use super::state::AppState;
use crate::aggregator::SearchOptions;
use crate::config::parse_list;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

/// Default number of records returned by the history endpoint
const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Items per source
    pub limit: Option<String>,
    /// Sources (comma-separated)
    pub providers: Option<String>,
    /// Bypass the cache when "true"
    pub fresh: Option<String>,
}

/// Query parameters for history
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<String>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn parse_limit(raw: Option<&str>, fallback: usize) -> usize {
    raw.and_then(|val| val.trim().parse().ok()).unwrap_or(fallback)
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339()
    }))
}

/// Search handler
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "query parameter `q` is required");
        }
    };

    let options = SearchOptions::new()
        .with_sources(params.providers.as_deref().map(parse_list).unwrap_or_default())
        .with_limit(parse_limit(params.limit.as_deref(), 0))
        .with_force_refresh(
            params
                .fresh
                .as_deref()
                .is_some_and(|val| val.trim().eq_ignore_ascii_case("true")),
        );

    let search = state.aggregator.search(&query, &options);
    match tokio::time::timeout(state.handler_timeout(), search).await {
        Ok(Ok(response)) => Json(response).into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(_) => {
            tracing::warn!("Search for '{}' exceeded the handler timeout", query);
            error_response(StatusCode::GATEWAY_TIMEOUT, "search timed out")
        }
    }
}

/// History handler
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_HISTORY_LIMIT);
    Json(serde_json::json!({
        "records": state.aggregator.history(limit)
    }))
}

/// Registered sources handler
pub async fn providers(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "providers": state.aggregator.source_names()
    }))
}

/// Metrics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.aggregator.stats())
}
