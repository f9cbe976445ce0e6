//! Product listing, detail and category handlers.

use axum::{
    Json,
    extract::{Path, RawQuery},
};
use serde::Serialize;
use tracing::instrument;

use crate::api::{Category, Pagination, Product};
use crate::error::Result;
use crate::listing::{ListingQuery, ListingView, SortOrder};
use crate::middleware::VisitorApi;

use super::Envelope;

/// Page numbers shown around the current page.
const PAGE_WINDOW: u32 = 5;

/// A sort option for the sort dropdown.
#[derive(Debug, Serialize)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Everything the listing page renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
    pub query: ListingQuery,
    /// Canonical query string for the current state (no leading `?`).
    pub query_string: String,
    pub has_filters: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
    pub page_window: Vec<u32>,
    pub sort_options: Vec<SortOption>,
}

impl From<&ListingView> for ListingPage {
    fn from(view: &ListingView) -> Self {
        let pagination = view.pagination();
        let query = view.query().clone();
        Self {
            products: view.products().to_vec(),
            pagination,
            query_string: query.to_query_string(),
            has_filters: query.has_filters(),
            prev_link: pagination
                .has_prev()
                .then(|| view.page_link(pagination.page - 1)),
            next_link: pagination
                .has_next()
                .then(|| view.page_link(pagination.page + 1)),
            page_window: pagination.page_window(PAGE_WINDOW),
            sort_options: SortOrder::ALL
                .into_iter()
                .map(|order| SortOption {
                    value: order.as_str(),
                    label: order.label(),
                    selected: order == query.sort,
                })
                .collect(),
            query,
        }
    }
}

/// Product listing. Filters, sort and page come from the URL.
///
/// # Errors
///
/// Returns an error if the backend call fails.
#[instrument(skip(api))]
pub async fn index(
    VisitorApi(api): VisitorApi,
    RawQuery(raw): RawQuery,
) -> Result<Json<Envelope<ListingPage>>> {
    let query = ListingQuery::from_query_string(raw.as_deref().unwrap_or_default());
    let page = api.list_products(&query).await?;
    let view = ListingView::new(query, 0, page);
    Ok(Envelope::ok(ListingPage::from(&view)))
}

/// Product detail.
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip(api))]
pub async fn show(
    VisitorApi(api): VisitorApi,
    Path(slug): Path<String>,
) -> Result<Json<Envelope<Product>>> {
    Ok(Envelope::ok(api.get_product(&slug).await?))
}

/// All categories.
///
/// # Errors
///
/// Returns an error if the backend call fails.
#[instrument(skip(api))]
pub async fn categories(VisitorApi(api): VisitorApi) -> Result<Json<Envelope<Vec<Category>>>> {
    Ok(Envelope::ok(api.list_categories().await?))
}
