//! Product listing and search-as-you-type.

use aurelle_core::Price;
use aurelle_storefront::api::{ApiClient, Product};
use aurelle_storefront::config::SearchConfig;
use aurelle_storefront::listing::{ListingQuery, ListingView, SortOrder};
use aurelle_storefront::search::{ProductSearch, SearchState, normalize_query};
use clap::Args;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CliError, out};

/// Filters for `aurelle products`.
#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,
    /// Category slug
    #[arg(short, long)]
    pub category: Option<String>,
    /// Sort order
    #[arg(long, value_parser = crate::parse_sort)]
    pub sort: Option<SortOrder>,
    /// Minimum price in rupees
    #[arg(long, value_parser = crate::parse_amount)]
    pub min_price: Option<Decimal>,
    /// Maximum price in rupees
    #[arg(long, value_parser = crate::parse_amount)]
    pub max_price: Option<Decimal>,
    /// Only products in stock
    #[arg(long)]
    pub in_stock: bool,
    /// Page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
    /// Products per page
    #[arg(short, long)]
    pub limit: Option<u32>,
}

impl ProductArgs {
    /// Build the listing query the storefront would put in its URL.
    pub fn to_query(&self) -> ListingQuery {
        let mut query = ListingQuery::default();
        if let Some(search) = &self.search {
            query.set_search(search);
        }
        query.set_category(self.category.as_deref());
        if let Some(sort) = self.sort {
            query.set_sort(sort);
        }
        query.set_price_range(self.min_price, self.max_price);
        query.set_in_stock(self.in_stock);
        if let Some(limit) = self.limit {
            query.set_limit(limit);
        }
        // Filter setters reset the page, so it goes last.
        query.set_page(self.page);
        query
    }
}

/// List one page of products.
pub async fn products(api: &ApiClient, args: &ProductArgs) -> Result<(), CliError> {
    let query = args.to_query();
    tracing::info!("Listing products: ?{}", query.to_query_string());

    let page = api.list_products(&query).await?;
    let view = ListingView::new(query, 0, page);

    if view.products().is_empty() {
        out("No products found");
        return Ok(());
    }
    for product in view.products() {
        out(product_line(product));
    }

    let pagination = view.pagination();
    out(format!(
        "Page {} of {} ({} products)",
        pagination.page, pagination.total_pages, pagination.total
    ));
    if pagination.has_next() {
        out(format!("Next: {}", view.page_link(pagination.page + 1)));
    }
    Ok(())
}

/// Search as you type. Every stdin line replaces the search box text; only
/// the last line of a quick burst reaches the backend.
pub async fn search(api: ApiClient, config: SearchConfig) -> Result<(), CliError> {
    let search = ProductSearch::new(api, config.suggestion_limit);
    let mut updates = search.subscribe();

    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if !state.loading {
                print_results(&state);
            }
        }
    });

    let debounced = search.debounced(config.debounce);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = String::new();
    while let Some(line) = lines.next_line().await? {
        last.clone_from(&line);
        debounced.call(line);
    }

    // Dropping the debouncer discards a call still waiting out its window;
    // run that final text directly unless it was already searched.
    drop(debounced);
    let settled = search.state();
    if normalize_query(&last).is_some_and(|q| q != settled.query) {
        search.run(&last).await;
    }

    drop(search);
    printer.await.ok();
    Ok(())
}

fn print_results(state: &SearchState) {
    if let Some(error) = &state.error {
        out(format!("\"{}\": {error}", state.query));
        return;
    }
    if state.query.is_empty() {
        return;
    }
    out(format!("\"{}\": {} result(s)", state.query, state.results.len()));
    for product in &state.results {
        out(format!("  {}", product_line(product)));
    }
}

fn product_line(product: &Product) -> String {
    let stock = if product.in_stock() { "" } else { " [out of stock]" };
    format!(
        "{:<40} {:>10}  {}{stock}",
        product.name,
        Price::inr(product.effective_price()).display(),
        product.slug
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args() -> ProductArgs {
        ProductArgs {
            search: None,
            category: None,
            sort: None,
            min_price: None,
            max_price: None,
            in_stock: false,
            page: 1,
            limit: None,
        }
    }

    #[test]
    fn test_args_keep_requested_page_after_filters() {
        let query = ProductArgs {
            category: Some("serums".to_string()),
            in_stock: true,
            page: 3,
            ..args()
        }
        .to_query();
        assert_eq!(query.page, 3);
        assert!(query.has_filters());
        let qs = query.to_query_string();
        assert!(qs.contains("category=serums"));
        assert!(qs.contains("inStock=1"));
    }

    #[test]
    fn test_default_args_have_no_filters() {
        let query = args().to_query();
        assert!(!query.has_filters());
        assert_eq!(query.page, 1);
    }
}
