//! Search-as-you-type over the product catalog.
//!
//! [`ProductSearch`] publishes its state through a `watch` channel. Every
//! search takes a token from a monotonically increasing counter and a
//! response is only published if its token is still the latest, so a slow
//! earlier response can never overwrite a later one. Requests are not
//! aborted; stale ones are simply ignored when they land.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError, Product};
use crate::debounce::Debouncer;
use crate::notice::Notice;

/// Backend operation used by [`ProductSearch`].
pub trait SearchApi: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;
}

impl SearchApi for ApiClient {
    fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send {
        self.search_products(query, limit)
    }
}

/// Trim a raw query; `None` means "show nothing, call nothing".
#[must_use]
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// What the search box currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    /// Token of the search this state belongs to.
    pub token: u64,
    pub results: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Token-sequenced product search.
pub struct ProductSearch<A> {
    inner: Arc<SearchInner<A>>,
}

struct SearchInner<A> {
    api: A,
    limit: u32,
    latest: AtomicU64,
    state: watch::Sender<SearchState>,
}

impl<A> Clone for ProductSearch<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: SearchApi> ProductSearch<A> {
    pub fn new(api: A, limit: u32) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(SearchInner {
                api,
                limit,
                latest: AtomicU64::new(0),
                state,
            }),
        }
    }

    /// Watch state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Run one search immediately.
    ///
    /// A blank query publishes empty results without calling the backend.
    /// Returns `false` if the response arrived after a newer search started
    /// and was discarded.
    #[instrument(skip(self))]
    pub async fn run(&self, raw: &str) -> bool {
        let token = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(query) = normalize_query(raw) else {
            self.inner.state.send_replace(SearchState {
                token,
                ..SearchState::default()
            });
            return true;
        };

        self.inner.state.send_modify(|state| {
            state.query = query.to_string();
            state.token = token;
            state.loading = true;
            state.error = None;
        });

        let result = self.inner.api.search(query, self.inner.limit).await;

        let published = self.inner.state.send_if_modified(|state| {
            if self.inner.latest.load(Ordering::SeqCst) != token {
                return false;
            }
            state.loading = false;
            match &result {
                Ok(products) => {
                    state.results.clone_from(products);
                    state.error = None;
                }
                Err(e) => {
                    state.results.clear();
                    state.error = Some(Notice::from_api_error(e, "Search failed").message);
                }
            }
            true
        });

        if !published {
            debug!(token, "Discarding stale search response");
        }
        published
    }

    /// Wrap this search in a debouncer so only the last keystroke of a
    /// burst issues a request.
    #[must_use]
    pub fn debounced(&self, window: Duration) -> Debouncer<String> {
        let search = self.clone();
        Debouncer::new(window, move |query: String| {
            let search = search.clone();
            async move {
                search.run(&query).await;
            }
        })
    }
}
