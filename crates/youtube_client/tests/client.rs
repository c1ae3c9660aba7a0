use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use datastore::{InMemoryRepository, Repository};
use domain::{ThumbnailSet, Video};
use video_service::{MockOptions, create_router};
use youtube_client::{ApiKey, ClientConfig, FailurePolicy, YouTubeClient, YouTubeError};

const KEY: &str = "test-key";

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/youtube/v3")
}

async fn fixture(repo: InMemoryRepository, options: MockOptions) -> String {
    let repo: Arc<dyn Repository> = Arc::new(repo);
    serve(create_router(repo, options)).await
}

fn strict_options() -> MockOptions {
    MockOptions {
        api_key: Some(KEY.to_string()),
        ..MockOptions::default()
    }
}

fn client(base_url: &str, key: &str) -> YouTubeClient {
    let config = ClientConfig::new(ApiKey::new(key).unwrap()).with_base_url(base_url);
    YouTubeClient::new(config).unwrap()
}

fn video(id: &str, title: &str) -> Video {
    Video {
        id: id.to_string(),
        channel_id: "channel-1".to_string(),
        title: title.to_string(),
        description: format!("about {title}"),
        channel_title: "Mock Channel".to_string(),
        published_at: "2023-01-01T00:00:00Z".to_string(),
        thumbnails: ThumbnailSet {
            default: Some(format!("https://i.ytimg.com/vi/{id}/default.jpg")),
            medium: None,
            high: None,
        },
    }
}

#[tokio::test]
async fn search_keeps_ranking_and_is_repeatable() {
    let repo = InMemoryRepository::new();
    repo.add_video(video("vid-b", "lofi rain"));
    repo.add_video(video("vid-a", "lofi snow"));
    repo.add_video(video("vid-c", "jazz"));
    let yt = client(&fixture(repo, strict_options()).await, KEY);

    let first = yt.search("lofi").await.unwrap();
    let ids: Vec<_> = first.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["vid-b", "vid-a"]);
    assert_eq!(
        first[0].thumbnail_url.as_deref(),
        Some("https://i.ytimg.com/vi/vid-b/default.jpg")
    );

    let second = yt.search("lofi").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn search_requests_a_full_page() {
    let repo = InMemoryRepository::new();
    for i in 0..30 {
        repo.add_video(video(&format!("vid-{i}"), "lofi"));
    }
    let yt = client(&fixture(repo, strict_options()).await, KEY);

    assert_eq!(yt.search("lofi").await.unwrap().len(), 25);
}

#[tokio::test]
async fn detail_of_unknown_video_is_absent() {
    let base = fixture(InMemoryRepository::with_sample_data(), strict_options()).await;
    let yt = client(&base, KEY);

    assert_eq!(yt.get_detail("abc123").await.unwrap(), None);
}

#[tokio::test]
async fn detail_of_known_video_is_reshaped() {
    let base = fixture(InMemoryRepository::with_sample_data(), strict_options()).await;
    let yt = client(&base, KEY);

    let detail = yt.get_detail("5qap5aO4i9A").await.unwrap().unwrap();
    assert_eq!(detail.title, "Tokyo night walk in the rain");
    assert_eq!(detail.channel_name, "Rambalac");
    assert!(detail.description.contains("Uploaded by Rambalac"));
}

#[tokio::test]
async fn rejected_request_is_an_error_not_a_missing_video() {
    let base = fixture(InMemoryRepository::with_sample_data(), strict_options()).await;
    let yt = client(&base, "wrong-key");

    let err = yt.get_detail("abc123").await.unwrap_err();
    assert!(matches!(err, YouTubeError::Status { status: 400, .. }), "{err:?}");

    let err = yt.search("lofi").await.unwrap_err();
    assert!(matches!(err, YouTubeError::Status { status: 400, .. }), "{err:?}");
}

#[tokio::test]
async fn exhausted_quota_surfaces_as_rate_limited() {
    let options = MockOptions {
        quota_exhausted: true,
        ..strict_options()
    };
    let base = fixture(InMemoryRepository::with_sample_data(), options).await;
    let yt = client(&base, KEY);

    let err = yt.search("lofi").await.unwrap_err();
    assert!(matches!(err, YouTubeError::RateLimited { status: 403, .. }), "{err:?}");
}

#[tokio::test]
async fn best_effort_search_swallows_failures_but_detail_does_not() {
    let base = fixture(InMemoryRepository::with_sample_data(), strict_options()).await;
    let config = ClientConfig::new(ApiKey::new("wrong-key").unwrap())
        .with_base_url(&base)
        .with_failure_policy(FailurePolicy::BestEffort);
    let yt = YouTubeClient::new(config).unwrap();

    assert!(yt.search("lofi").await.unwrap().is_empty());
    assert!(yt.get_detail("5qap5aO4i9A").await.is_err());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let yt = client(&format!("http://{addr}/youtube/v3"), KEY);
    let err = yt.get_detail("abc123").await.unwrap_err();
    assert!(matches!(err, YouTubeError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn slow_service_hits_the_timeout() {
    let router = Router::new().route(
        "/youtube/v3/videos",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "{}"
        }),
    );
    let base = serve(router).await;
    let config = ClientConfig::new(ApiKey::new(KEY).unwrap())
        .with_base_url(&base)
        .with_timeout(Duration::from_millis(200));
    let yt = YouTubeClient::new(config).unwrap();

    let err = yt.get_detail("abc123").await.unwrap_err();
    assert!(err.is_timeout(), "{err:?}");
}

#[tokio::test]
async fn blank_video_id_is_rejected_before_any_request() {
    // Nothing listens here; a request would fail with a transport error
    let yt = client("http://127.0.0.1:9/youtube/v3", KEY);
    let err = yt.get_detail("  ").await.unwrap_err();
    assert!(matches!(err, YouTubeError::EmptyVideoId));
}

#[test]
fn missing_credential_fails_client_construction() {
    let err = ClientConfig::from_lookup(|_| None)
        .map_err(YouTubeError::from)
        .and_then(YouTubeClient::new)
        .unwrap_err();
    assert!(matches!(err, YouTubeError::Config(_)));
}
