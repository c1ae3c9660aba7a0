use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier YouTube assigns to a single playable video.
///
/// Never empty. Made only of ASCII letters, digits, `-` and `_`, the
/// alphabet YouTube uses for video ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

/// Returned when a string cannot be used as a [`VideoId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVideoId(pub String);

impl fmt::Display for InvalidVideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid video id {:?}", self.0)
    }
}

impl std::error::Error for InvalidVideoId {}

impl VideoId {
    /// Returns `None` for blank input or input with any character outside
    /// `[A-Za-z0-9_-]`, so a list such as `a,b` is never accepted as one id.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let valid = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if trimmed.is_empty() || !trimmed.chars().all(valid) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = InvalidVideoId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(InvalidVideoId(value))
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// One entry of a keyword search, in the order YouTube ranked it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: VideoId,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub channel_name: String,
    pub published_at: String,
}

/// Metadata for exactly one video, as shown on the watch page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetailRecord {
    pub title: String,
    pub description: String,
    pub channel_name: String,
    pub published_at: String,
}

/// Thumbnail urls of a stored video, keyed by YouTube's size names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    pub default: Option<String>,
    pub medium: Option<String>,
    pub high: Option<String>,
}

/// Represents a video resource held by the fixture API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
    pub thumbnails: ThumbnailSet,
}
