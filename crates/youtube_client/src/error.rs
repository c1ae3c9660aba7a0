use thiserror::Error;

/// Problems with the values the adapter is configured from
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YOUTUBE_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors returned by the search and detail operations.
///
/// A video that does not exist is not an error; `get_detail` reports it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum YouTubeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("video id must not be empty")]
    EmptyVideoId,

    #[error("request to YouTube failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("YouTube responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("YouTube quota or rate limit hit (status {status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("could not decode YouTube response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl YouTubeError {
    /// True when the request never produced a response in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, YouTubeError::Transport(e) if e.is_timeout())
    }
}
