//! Marketing page route handlers.
//!
//! Serves the markdown pages loaded at startup: about, privacy, terms and
//! support.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use tracing::instrument;

use crate::content::REQUIRED_PAGES;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub title: String,
    pub description: String,
    pub updated_at: Option<String>,
    pub content_html: String,
}

/// Serve a content page by slug.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ContentPageTemplate> {
    let page = state
        .content()
        .get_page(&slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at.map(|d| d.to_string()),
        content_html: page.content_html.clone(),
    })
}

/// Create the pages routes router, one route per bundled page.
pub fn router() -> Router<AppState> {
    REQUIRED_PAGES
        .into_iter()
        .fold(Router::new(), |router, slug| {
            router.route(
                &format!("/{slug}"),
                get(move |state: State<AppState>| show(state, Path(slug.to_string()))),
            )
        })
}
