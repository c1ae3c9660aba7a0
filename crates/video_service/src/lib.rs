//! Local stand-in for the two YouTube Data API v3 endpoints the front-end
//! consumes: `search.list` and `videos.list`.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use domain::{ThumbnailSet, Video as StoredVideo};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// YouTube's own default when `maxResults` is omitted
const DEFAULT_MAX_RESULTS: u32 = 5;
const MAX_RESULTS_LIMIT: u32 = 50;

/// Knobs for how the fixture API treats incoming requests
#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    /// When set, requests must carry exactly this `key`. Otherwise any
    /// non-empty key is accepted.
    pub api_key: Option<String>,
    /// Answer every request as if the daily quota were used up
    pub quota_exhausted: bool,
}

#[derive(Clone)]
struct ServiceState {
    repo: Arc<dyn datastore::Repository>,
    options: Arc<MockOptions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListParams {
    #[serde(default)]
    pub part: String,
    #[serde(default)]
    pub q: String,
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub max_results: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideosListParams {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub part: String,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub kind: String,
    pub etag: String,
    pub page_info: PageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: i32,
    pub results_per_page: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub kind: String,
    pub etag: String,
    pub id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub published_at: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnails: Thumbnails,
    pub channel_title: String,
    pub live_broadcast_content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub kind: String,
    pub etag: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<VideoSnippet>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub published_at: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnails: Thumbnails,
    pub channel_title: String,
}

#[derive(Debug, Serialize)]
pub struct Thumbnails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Serialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Google's error envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub domain: String,
    pub reason: String,
}

fn error_response(status: StatusCode, domain: &str, reason: &str, message: &str) -> Response {
    let body = ErrorResponse {
        error: ErrorBody {
            code: status.as_u16(),
            message: message.to_string(),
            errors: vec![ErrorDetail {
                message: message.to_string(),
                domain: domain.to_string(),
                reason: reason.to_string(),
            }],
        },
    };
    (status, Json(body)).into_response()
}

fn authorize(options: &MockOptions, key: Option<&str>) -> Result<(), Response> {
    let key = key.map(str::trim).filter(|k| !k.is_empty());
    let Some(key) = key else {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "global",
            "forbidden",
            "The request is missing a valid API key.",
        ));
    };

    if options.api_key.as_deref().is_some_and(|expected| expected != key) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "global",
            "badRequest",
            "API key not valid. Please pass a valid API key.",
        ));
    }

    if options.quota_exhausted {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "youtube.quota",
            "quotaExceeded",
            "The request cannot be completed because you have exceeded your quota.",
        ));
    }

    Ok(())
}

fn requested_parts(part: &str) -> Vec<&str> {
    part.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn thumbnails(set: &ThumbnailSet) -> Thumbnails {
    let sized = |url: &Option<String>, width, height| {
        url.as_ref().map(|url| Thumbnail {
            url: url.clone(),
            width,
            height,
        })
    };
    Thumbnails {
        default: sized(&set.default, 120, 90),
        medium: sized(&set.medium, 320, 180),
        high: sized(&set.high, 480, 360),
    }
}

fn list_response<T>(kind: &str, items: Vec<T>) -> ListResponse<T> {
    let count = items.len() as i32;
    ListResponse {
        kind: kind.to_string(),
        etag: format!("etag-{kind}-{count}"),
        page_info: PageInfo {
            total_results: count,
            results_per_page: count,
        },
        next_page_token: None,
        items,
    }
}

fn search_result(video: StoredVideo, include_snippet: bool) -> SearchResult {
    let snippet = include_snippet.then(|| SearchSnippet {
        published_at: video.published_at.clone(),
        channel_id: video.channel_id.clone(),
        title: video.title.clone(),
        description: video.description.clone(),
        thumbnails: thumbnails(&video.thumbnails),
        channel_title: video.channel_title.clone(),
        live_broadcast_content: "none".to_string(),
    });
    SearchResult {
        kind: "youtube#searchResult".to_string(),
        etag: format!("etag-search-{}", video.id),
        id: ResourceId {
            kind: "youtube#video".to_string(),
            video_id: Some(video.id),
        },
        snippet,
    }
}

fn video_resource(video: StoredVideo, include_snippet: bool) -> Video {
    let snippet = include_snippet.then(|| VideoSnippet {
        published_at: video.published_at.clone(),
        channel_id: video.channel_id.clone(),
        title: video.title.clone(),
        description: video.description.clone(),
        thumbnails: thumbnails(&video.thumbnails),
        channel_title: video.channel_title.clone(),
    });
    Video {
        kind: "youtube#video".to_string(),
        etag: format!("etag-video-{}", video.id),
        id: video.id,
        snippet,
    }
}

async fn search_list(
    State(state): State<ServiceState>,
    Query(params): Query<SearchListParams>,
) -> Response {
    if let Err(rejection) = authorize(&state.options, params.key.as_deref()) {
        return rejection;
    }

    let max_results = match params.max_results.as_deref() {
        None => DEFAULT_MAX_RESULTS,
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(n) if n <= MAX_RESULTS_LIMIT => n,
            _ => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "youtube.parameter",
                    "invalidParameter",
                    &format!("Invalid value '{raw}' for parameter maxResults."),
                );
            }
        },
    };

    // Only videos are stored, so a search restricted to other kinds is empty
    let wants_videos = params
        .resource_type
        .as_deref()
        .is_none_or(|types| requested_parts(types).contains(&"video"));

    let parts = requested_parts(&params.part);
    let include_snippet = parts.contains(&"snippet");

    let items: Vec<SearchResult> = if wants_videos {
        state
            .repo
            .search_videos(&params.q, max_results as usize)
            .into_iter()
            .map(|video| search_result(video, include_snippet))
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(query = %params.q, count = items.len(), "fixture search.list");
    (StatusCode::OK, Json(list_response("youtube#searchListResponse", items))).into_response()
}

async fn videos_list(
    State(state): State<ServiceState>,
    Query(params): Query<VideosListParams>,
) -> Response {
    if let Err(rejection) = authorize(&state.options, params.key.as_deref()) {
        return rejection;
    }

    let ids = requested_parts(&params.id);
    if ids.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "youtube.parameter",
            "missingRequiredParameter",
            "No filter selected. Expected one of: id, chart, myRating",
        );
    }

    let parts = requested_parts(&params.part);
    let include_snippet = parts.contains(&"snippet");

    let items: Vec<Video> = ids
        .into_iter()
        .filter_map(|id| state.repo.get_video(id))
        .map(|video| video_resource(video, include_snippet))
        .collect();

    tracing::debug!(id = %params.id, count = items.len(), "fixture videos.list");
    (StatusCode::OK, Json(list_response("youtube#videoListResponse", items))).into_response()
}

/// Create the router for the fixture video API
pub fn create_router(repo: Arc<dyn datastore::Repository>, options: MockOptions) -> Router {
    let state = ServiceState {
        repo,
        options: Arc::new(options),
    };
    Router::new()
        .route("/youtube/v3/search", get(search_list))
        .route("/youtube/v3/videos", get(videos_list))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use datastore::InMemoryRepository;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router(options: MockOptions) -> Router {
        create_router(Arc::new(InMemoryRepository::with_sample_data()), options)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn search_returns_snippets_in_youtube_shape() {
        let (status, body) = get_json(
            router(MockOptions::default()),
            "/youtube/v3/search?part=snippet&type=video&maxResults=25&q=lofi&key=k",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "youtube#searchListResponse");
        let first = &body["items"][0];
        assert_eq!(first["id"]["videoId"], "jfKfPfyJRdk");
        assert_eq!(first["snippet"]["channelTitle"], "Lofi Girl");
        assert!(first["snippet"]["thumbnails"]["high"]["url"].is_string());
    }

    #[tokio::test]
    async fn search_honours_max_results() {
        let (_, body) = get_json(
            router(MockOptions::default()),
            "/youtube/v3/search?part=snippet&maxResults=1&q=&key=k",
        )
        .await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);

        let (status, _) = get_json(
            router(MockOptions::default()),
            "/youtube/v3/search?part=snippet&maxResults=51&q=&key=k",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn videos_list_returns_empty_items_for_unknown_id() {
        let (status, body) = get_json(
            router(MockOptions::default()),
            "/youtube/v3/videos?part=snippet&id=abc123&key=k",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn videos_list_returns_snippet_for_known_id() {
        let (_, body) = get_json(
            router(MockOptions::default()),
            "/youtube/v3/videos?part=snippet&id=5qap5aO4i9A&key=k",
        )
        .await;

        assert_eq!(body["items"][0]["id"], "5qap5aO4i9A");
        assert_eq!(body["items"][0]["snippet"]["channelTitle"], "Rambalac");
    }

    #[tokio::test]
    async fn missing_or_wrong_key_is_rejected() {
        let options = MockOptions {
            api_key: Some("secret".to_string()),
            ..MockOptions::default()
        };

        let (status, body) = get_json(router(options.clone()), "/youtube/v3/search?q=x").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["errors"][0]["reason"], "forbidden");

        let (status, body) = get_json(router(options), "/youtube/v3/search?q=x&key=nope").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
    }

    #[tokio::test]
    async fn exhausted_quota_is_reported() {
        let options = MockOptions {
            quota_exhausted: true,
            ..MockOptions::default()
        };

        let (status, body) = get_json(router(options), "/youtube/v3/videos?id=a&key=k").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["errors"][0]["reason"], "quotaExceeded");
    }
}
