use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// YouTube caps `maxResults` at 50
const MAX_PAGE_SIZE: u32 = 50;

/// Credential sent as the `key` query parameter. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// What `search` does when YouTube cannot be reached or answers with an error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the error to the caller
    #[default]
    Strict,
    /// Log a warning and return an empty result list
    BestEffort,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(FailurePolicy::Strict),
            "best-effort" | "best_effort" | "besteffort" => Ok(FailurePolicy::BestEffort),
            _ => Err(ConfigError::Invalid {
                name: "YOUTUBE_FAILURE_POLICY",
                value: s.to_string(),
                reason: "expected `strict` or `best-effort`".to_string(),
            }),
        }
    }
}

/// Everything the adapter needs to talk to YouTube
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    /// Base url without a trailing slash, e.g. `https://www.googleapis.com/youtube/v3`
    pub base_url: String,
    /// Value sent as `maxResults` on every search
    pub page_size: u32,
    /// Upper bound for a single request, connection included
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl ClientConfig {
    /// Config with default endpoint, page size, timeout and strict failures
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the config from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the config through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("YOUTUBE_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let mut config = Self::new(ApiKey::new(api_key)?);

        if let Some(base_url) = lookup("YOUTUBE_API_BASE").filter(|v| !v.trim().is_empty()) {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    name: "YOUTUBE_API_BASE",
                    value: base_url,
                    reason: "expected an http(s) url".to_string(),
                });
            }
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = lookup("YOUTUBE_PAGE_SIZE") {
            config.page_size = match raw.trim().parse::<u32>() {
                Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "YOUTUBE_PAGE_SIZE",
                        value: raw,
                        reason: format!("expected an integer between 1 and {MAX_PAGE_SIZE}"),
                    });
                }
            };
        }

        if let Some(raw) = lookup("YOUTUBE_TIMEOUT_SECS") {
            config.timeout = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "YOUTUBE_TIMEOUT_SECS",
                        value: raw,
                        reason: "expected a positive number of seconds".to_string(),
                    });
                }
            };
        }

        if let Some(raw) = lookup("YOUTUBE_FAILURE_POLICY") {
            config.failure_policy = raw.parse()?;
        }

        Ok(config)
    }
}
