//! Search suggestion handler.
//!
//! The browser debounces keystrokes; each request here is one search.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::VisitorApi;
use crate::search::{ProductSearch, SearchState};
use crate::state::AppState;

use super::Envelope;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search suggestions. A blank query answers with no results and no
/// backend call; a backend failure is reported in `error`.
///
/// # Errors
///
/// This handler does not fail; errors are part of the returned state.
#[instrument(skip(state, api))]
pub async fn suggest(
    State(state): State<AppState>,
    VisitorApi(api): VisitorApi,
    Query(params): Query<SearchParams>,
) -> Result<Json<Envelope<SearchState>>> {
    let search = ProductSearch::new(api, state.config().search.suggestion_limit);
    search.run(&params.q).await;
    Ok(Envelope::ok(search.state()))
}
