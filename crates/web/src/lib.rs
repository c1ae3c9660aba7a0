//! HTTP front-end: HTML search and watch pages plus a JSON feed of the same
//! data.

pub mod render;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use domain::{SearchResultItem, VideoId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use youtube_client::{YouTubeClient, YouTubeError};

use render::Listing;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    client: Arc<YouTubeClient>,
}

impl AppState {
    pub fn new(client: YouTubeClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchPayload {
    pub query: String,
    pub items: Vec<SearchResultItem>,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Failures of the JSON endpoints
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("video not found")]
    NotFound,
    #[error("could not reach YouTube")]
    Upstream(#[from] YouTubeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(err) => {
                tracing::error!(error = %err, "YouTube request failed");
                StatusCode::BAD_GATEWAY
            }
        };
        let body = ErrorPayload {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn search_page(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.trim();
    if query.is_empty() {
        return Html(render::search_page("", &Listing::Prompt)).into_response();
    }

    match state.client.search(query).await {
        Ok(items) => Html(render::search_page(query, &Listing::Results(&items))).into_response(),
        Err(err) => {
            tracing::error!(%query, error = %err, "search failed");
            (
                StatusCode::BAD_GATEWAY,
                Html(render::search_page(query, &Listing::Failed)),
            )
                .into_response()
        }
    }
}

async fn watch_page(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let not_found = || (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response();

    let Some(id) = VideoId::parse(&raw_id) else {
        return not_found();
    };

    match state.client.get_detail(id.as_str()).await {
        Ok(Some(video)) => Html(render::watch_page(&id, &video)).into_response(),
        Ok(None) => not_found(),
        Err(err) => {
            tracing::error!(video_id = %id, error = %err, "video lookup failed");
            (StatusCode::BAD_GATEWAY, Html(render::watch_error_page())).into_response()
        }
    }
}

async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPayload>, ApiError> {
    let query = params.q.trim().to_string();
    let items = if query.is_empty() {
        Vec::new()
    } else {
        state.client.search(&query).await?
    };
    Ok(Json(SearchPayload { query, items }))
}

async fn api_video(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<domain::VideoDetailRecord>, ApiError> {
    let id = VideoId::parse(&raw_id).ok_or(ApiError::NotFound)?;
    let video = state
        .client
        .get_detail(id.as_str())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(video))
}

/// Create the router for the front-end
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_page))
        .route("/watch/{id}", get(watch_page))
        .route("/api/search", get(api_search))
        .route("/api/videos/{id}", get(api_video))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
