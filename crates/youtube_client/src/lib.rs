//! Adapter between the YouTube Data API v3 and the front-end's records.
//!
//! Two operations: [`YouTubeClient::search`] and
//! [`YouTubeClient::get_detail`]. Responses are decoded into narrow wire
//! types and reshaped by pure functions in [`normalize`].

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod session;
pub mod wire;

pub use client::YouTubeClient;
pub use config::{ApiKey, ClientConfig, FailurePolicy};
pub use error::{ConfigError, YouTubeError};
pub use session::{SearchSession, SearchState, VideoSearch};
