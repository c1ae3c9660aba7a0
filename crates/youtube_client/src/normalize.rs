//! Reshapes wire responses into the records the front-end renders.

use domain::{SearchResultItem, VideoDetailRecord, VideoId};

use crate::wire::{SearchListResponse, SearchResult, Thumbnail, Thumbnails, VideoListResponse};

/// Largest available thumbnail: high, then medium, then default.
/// Entries with an empty url count as missing.
pub fn best_thumbnail(thumbnails: &Thumbnails) -> Option<String> {
    [&thumbnails.high, &thumbnails.medium, &thumbnails.default]
        .into_iter()
        .flatten()
        .map(|Thumbnail { url }| url.trim())
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// `None` when the result has no usable video id
pub fn search_item(result: SearchResult) -> Option<SearchResultItem> {
    let Some(id) = result.id.video_id.as_deref().and_then(VideoId::parse) else {
        tracing::debug!(
            kind = result.id.kind.as_deref().unwrap_or("unknown"),
            "skipping search result without a video id"
        );
        return None;
    };
    let snippet = result.snippet.unwrap_or_default();

    Some(SearchResultItem {
        id,
        thumbnail_url: best_thumbnail(&snippet.thumbnails),
        title: snippet.title,
        channel_name: snippet.channel_title,
        published_at: snippet.published_at,
    })
}

/// All playable results, in the order YouTube returned them
pub fn search_items(response: SearchListResponse) -> Vec<SearchResultItem> {
    response.items.into_iter().filter_map(search_item).collect()
}

/// First video of the response, or `None` when nothing matched
pub fn video_detail(response: VideoListResponse) -> Option<VideoDetailRecord> {
    let video = response.items.into_iter().next()?;
    let snippet = video.snippet.unwrap_or_default();

    Some(VideoDetailRecord {
        title: snippet.title,
        description: snippet.description,
        channel_name: snippet.channel_title,
        published_at: snippet.published_at,
    })
}
