//! HTTP transport front.
//!
//! Thin GET routes under `/api/webscout/` over the four core entry points.
//! Handlers only translate between query strings and core calls; any policy
//! (skip vs fail, result shapes) lives in the core crates.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::params::{DownloadParams, EncyclopediaParams, ExtractParams, WebSearchParams};
use crate::services::Services;
use scout_common::ScoutError;
use scout_web::download::download_file;
use scout_web::{Extractor, SearchResult};

#[derive(Clone)]
struct AppState {
    services: Arc<Services>,
}

/// A core failure rendered as a JSON error body.
struct ApiError(ScoutError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ScoutError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<ScoutError> for ApiError {
    fn from(e: ScoutError) -> Self {
        Self(e)
    }
}

pub fn build_router(services: Arc<Services>) -> Router {
    let state = AppState { services };
    Router::new()
        .route("/api/webscout/search_encyclopedia", get(search_encyclopedia))
        .route("/api/webscout/search_web", get(search_web))
        .route("/api/webscout/extract_page", get(extract_page))
        .route("/api/webscout/download_file", get(download))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn search_encyclopedia(
    State(state): State<AppState>,
    Query(params): Query<EncyclopediaParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let articles = state
        .services
        .wiki
        .search_articles(&params.query, &params.lang, params.num_results)
        .await?;
    Ok(Json(articles))
}

async fn search_web(
    State(state): State<AppState>,
    Query(params): Query<WebSearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let results = state
        .services
        .searcher
        .search_web(
            &params.query,
            params.max_results,
            Some(params.site.as_str()),
            params.detail,
        )
        .await?;
    Ok(Json(results))
}

async fn extract_page(
    State(state): State<AppState>,
    Query(params): Query<ExtractParams>,
) -> Json<Option<SearchResult>> {
    Json(state.services.extractor.extract_page(&params.url).await)
}

async fn download(Query(params): Query<DownloadParams>) -> Json<bool> {
    let saved = download_file(&params.url, Path::new(&params.save_path)).await;
    Json(saved.is_some())
}
