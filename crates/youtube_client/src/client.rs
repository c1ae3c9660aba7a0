use domain::{SearchResultItem, VideoDetailRecord};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, FailurePolicy};
use crate::error::YouTubeError;
use crate::normalize;
use crate::wire::{ErrorResponse, SearchListResponse, VideoListResponse};

/// Reasons under which Google reports quota and rate limiting
const RATE_LIMIT_REASONS: &[&str] = &["quotaExceeded", "rateLimitExceeded", "userRateLimitExceeded"];

/// Client for the YouTube Data API `search` and `videos` endpoints.
///
/// Cheap to share behind an `Arc`; every call is an independent request.
#[derive(Debug)]
pub struct YouTubeClient {
    http: Client,
    config: ClientConfig,
}

impl YouTubeClient {
    pub fn new(config: ClientConfig) -> Result<Self, YouTubeError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Build a client from `YOUTUBE_*` environment variables.
    ///
    /// Fails before any request is made when the API key is missing.
    pub fn from_env() -> Result<Self, YouTubeError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search videos matching `query`, sent verbatim.
    ///
    /// Results keep YouTube's ranking. Under [`FailurePolicy::BestEffort`] a
    /// failed request yields an empty list instead of an error.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, YouTubeError> {
        let page_size = self.config.page_size.to_string();
        let params = [
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", page_size.as_str()),
            ("q", query),
        ];

        match self.fetch::<SearchListResponse>("search", &params).await {
            Ok(response) => Ok(normalize::search_items(response)),
            Err(err) if self.config.failure_policy == FailurePolicy::BestEffort => {
                tracing::warn!(%query, error = %err, "search failed, returning no results");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Metadata for one video, `Ok(None)` when YouTube knows no such id.
    ///
    /// Failures are always returned as errors so callers can tell them
    /// apart from a missing video.
    pub async fn get_detail(&self, video_id: &str) -> Result<Option<VideoDetailRecord>, YouTubeError> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Err(YouTubeError::EmptyVideoId);
        }

        let params = [("part", "snippet"), ("id", video_id)];
        let response = self.fetch::<VideoListResponse>("videos", &params).await?;
        let detail = normalize::video_detail(response);
        if detail.is_none() {
            tracing::debug!(%video_id, "video not found");
        }
        Ok(detail)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        tracing::debug!(%url, ?params, "calling YouTube");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.config.api_key.expose())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn status_error(status: StatusCode, body: &str) -> YouTubeError {
    let envelope: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    let message = if envelope.error.message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        envelope.error.message
    };

    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && envelope
                .error
                .errors
                .iter()
                .any(|detail| RATE_LIMIT_REASONS.contains(&detail.reason.as_str())));

    let status = status.as_u16();
    if rate_limited {
        YouTubeError::RateLimited { status, message }
    } else {
        YouTubeError::Status { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_reason_maps_to_rate_limited() {
        let body = r#"{"error":{"code":403,"message":"quota","errors":[{"reason":"quotaExceeded"}]}}"#;
        let err = status_error(StatusCode::FORBIDDEN, body);
        assert!(matches!(err, YouTubeError::RateLimited { status: 403, .. }));
    }

    #[test]
    fn too_many_requests_is_rate_limited_without_a_body() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, YouTubeError::RateLimited { status: 429, .. }));
    }

    #[test]
    fn other_statuses_keep_the_upstream_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","errors":[{"reason":"badRequest"}]}}"#;
        match status_error(StatusCode::BAD_REQUEST, body) {
            YouTubeError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_error_bodies_fall_back_to_reason_phrase() {
        match status_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") {
            YouTubeError::Status { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
