use chrono::{Duration, SecondsFormat, TimeZone, Utc};
use domain::{ThumbnailSet, Video};
use std::sync::{Arc, RwLock};

/// Repository trait for the videos served by the fixture API
pub trait Repository: Send + Sync {
    /// Get a video by ID
    fn get_video(&self, id: &str) -> Option<Video>;

    /// Videos whose title, description or channel title contain `query`
    /// (case-insensitive), in insertion order, at most `limit` of them.
    /// An empty query matches every video.
    fn search_videos(&self, query: &str, limit: usize) -> Vec<Video>;

    /// Add a video, replacing any stored video with the same ID in place
    fn add_video(&self, video: Video);
}

/// In-memory implementation of the Repository trait.
///
/// Insertion order doubles as the relevance ranking returned by searches.
pub struct InMemoryRepository {
    videos: Arc<RwLock<Vec<Video>>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            videos: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a repository holding a handful of sample videos
    pub fn with_sample_data() -> Self {
        let repo = Self::new();
        repo.populate_sample_data();
        repo
    }

    fn populate_sample_data(&self) {
        // Fixed point in time for consistent sample data
        let base = Utc
            .with_ymd_and_hms(2024, 1, 5, 9, 30, 0)
            .single()
            .expect("Fixed datetime should be valid");

        let samples = [
            ("jfKfPfyJRdk", "lofi hip hop radio 📚 beats to relax/study to", "Lofi Girl", "UCSJ4gkVC6NrvII8umztf0Ow"),
            ("4xDzrJKXOOY", "synthwave radio 🌌 beats to chill/game to", "Lofi Girl", "UCSJ4gkVC6NrvII8umztf0Ow"),
            ("rUxyKA_-grg", "Rainy Jazz Cafe &amp; Slow Jazz for Work", "Cafe Music BGM channel", "UCJhjE7wbdYAae1G25m0tHAA"),
            ("5qap5aO4i9A", "Tokyo night walk in the rain", "Rambalac", "UCAcsAE1tpLuP3y7UhxUoWpQ"),
        ];

        for (i, (id, title, channel_title, channel_id)) in samples.into_iter().enumerate() {
            let published = base - Duration::days(30 * i as i64);
            self.add_video(Video {
                id: id.to_string(),
                channel_id: channel_id.to_string(),
                title: title.to_string(),
                description: format!("{title}\n\nUploaded by {channel_title}."),
                channel_title: channel_title.to_string(),
                published_at: published.to_rfc3339_opts(SecondsFormat::Secs, true),
                thumbnails: ThumbnailSet {
                    default: Some(format!("https://i.ytimg.com/vi/{id}/default.jpg")),
                    medium: Some(format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg")),
                    high: Some(format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")),
                },
            });
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(video: &Video, needle: &str) -> bool {
    [&video.title, &video.description, &video.channel_title]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

impl Repository for InMemoryRepository {
    fn get_video(&self, id: &str) -> Option<Video> {
        self.videos
            .read()
            .expect("Failed to acquire read lock on videos")
            .iter()
            .find(|video| video.id == id)
            .cloned()
    }

    fn search_videos(&self, query: &str, limit: usize) -> Vec<Video> {
        let needle = query.trim().to_lowercase();
        self.videos
            .read()
            .expect("Failed to acquire read lock on videos")
            .iter()
            .filter(|video| needle.is_empty() || matches(video, &needle))
            .take(limit)
            .cloned()
            .collect()
    }

    fn add_video(&self, video: Video) {
        let mut videos = self
            .videos
            .write()
            .expect("Failed to acquire write lock on videos");
        match videos.iter_mut().find(|stored| stored.id == video.id) {
            Some(stored) => *stored = video,
            None => videos.push(video),
        }
    }
}
