//! Search-as-you-type: only the most recently submitted query may publish
//! its results.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use domain::SearchResultItem;
use tokio::sync::watch;

use crate::client::YouTubeClient;
use crate::error::YouTubeError;

/// Anything that can run a keyword search
pub trait VideoSearch: Send + Sync {
    fn search_videos(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResultItem>, YouTubeError>> + Send;
}

impl VideoSearch for YouTubeClient {
    fn search_videos(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResultItem>, YouTubeError>> + Send {
        self.search(query)
    }
}

/// What a search UI should currently show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    /// No query entered
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Ready {
        query: String,
        items: Vec<SearchResultItem>,
    },
    Failed {
        query: String,
        message: String,
    },
}

/// Runs searches for a stream of queries and publishes the state of the
/// latest one.
///
/// Each submission takes a new generation. A search that finishes after a
/// newer submission is discarded, so a slow response for a stale query never
/// replaces the results of the current one.
pub struct SearchSession<S> {
    searcher: S,
    generation: AtomicU64,
    state: watch::Sender<SearchState>,
}

impl<S: VideoSearch> SearchSession<S> {
    pub fn new(searcher: S) -> Self {
        Self {
            searcher,
            generation: AtomicU64::new(0),
            state: watch::Sender::new(SearchState::Idle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Search for `raw_query` (trimmed). A blank query resets the session to
    /// [`SearchState::Idle`] without searching.
    ///
    /// Returns `false` when the outcome was discarded because a newer query
    /// was submitted meanwhile.
    pub async fn submit(&self, raw_query: &str) -> bool {
        let query = raw_query.trim().to_string();

        if query.is_empty() {
            self.begin(SearchState::Idle);
            return true;
        }

        let generation = self.begin(SearchState::Loading {
            query: query.clone(),
        });

        let outcome = self.searcher.search_videos(&query).await;

        let next = match outcome {
            Ok(items) => SearchState::Ready {
                query: query.clone(),
                items,
            },
            Err(err) => {
                tracing::error!(%query, error = %err, "search failed");
                SearchState::Failed {
                    query: query.clone(),
                    message: "Search failed. Please try again.".to_string(),
                }
            }
        };

        let committed = self.commit(generation, next);
        if !committed {
            tracing::debug!(%query, "discarding results for superseded query");
        }
        committed
    }

    /// Take the next generation and publish `state` while holding the
    /// channel lock, so no commit can interleave with the bump.
    fn begin(&self, state: SearchState) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|current| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = state;
        });
        generation
    }

    /// Publish `next` only if `generation` is still the latest one. The check
    /// and the write happen under the same lock.
    fn commit(&self, generation: u64, next: SearchState) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = next;
            true
        })
    }
}
