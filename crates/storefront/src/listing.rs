//! Product listing filters, URL state and client-side sort.
//!
//! The listing page is a pure function of its URL: [`ListingQuery`]
//! round-trips through the query string, leaving out values that equal
//! their defaults. Changing any filter or the sort order sends the visitor
//! back to page 1.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::api::{Pagination, Product, ProductPage};
use crate::sync::Synced;

/// Default page size for product grids.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page size the listing will request.
pub const MAX_PAGE_SIZE: u32 = 48;

/// Grid sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
    Name,
}

impl SortOrder {
    pub const ALL: [Self; 5] = [
        Self::Newest,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Rating,
        Self::Name,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Rating => "rating",
            Self::Name => "name",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceAsc => "Price: low to high",
            Self::PriceDesc => "Price: high to low",
            Self::Rating => "Top rated",
            Self::Name => "Name",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| format!("invalid sort order: {s}"))
    }
}

/// Filters, sort and page of a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub sort: SortOrder,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: bool,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            q: None,
            category: None,
            sort: SortOrder::default(),
            min_price: None,
            max_price: None,
            in_stock: false,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListingQuery {
    /// Parse a URL query string. Unknown keys and malformed values fall
    /// back to their defaults.
    #[must_use]
    pub fn from_query_string(raw: &str) -> Self {
        let mut query = Self::default();

        for (key, value) in form_urlencoded::parse(raw.trim_start_matches('?').as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                "q" => query.q = non_empty(value),
                "category" => query.category = non_empty(value),
                "sort" => query.sort = value.parse().unwrap_or_default(),
                "minPrice" => query.min_price = value.parse().ok(),
                "maxPrice" => query.max_price = value.parse().ok(),
                "inStock" => query.in_stock = matches!(value, "1" | "true"),
                "page" => query.page = value.parse().ok().filter(|p| *p >= 1).unwrap_or(1),
                "limit" => {
                    query.limit = value
                        .parse()
                        .ok()
                        .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
                        .unwrap_or(DEFAULT_PAGE_SIZE);
                }
                _ => {}
            }
        }

        query
    }

    /// Encode as a URL query string (without `?`), omitting defaults.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.url_pairs() {
            out.append_pair(key, &value);
        }
        out.finish()
    }

    /// Parameters for the backend `product` endpoint.
    #[must_use]
    pub fn api_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        if let Some(q) = &self.q {
            params.push(("search", q.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(min) = self.min_price {
            params.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("maxPrice", max.to_string()));
        }
        if self.in_stock {
            params.push(("inStock", "true".to_string()));
        }
        params
    }

    fn url_pairs(&self) -> Vec<(&'static str, String)> {
        let defaults = Self::default();
        let mut pairs = Vec::new();
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if self.sort != defaults.sort {
            pairs.push(("sort", self.sort.as_str().to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        if self.in_stock {
            pairs.push(("inStock", "1".to_string()));
        }
        if self.page != defaults.page {
            pairs.push(("page", self.page.to_string()));
        }
        if self.limit != defaults.limit {
            pairs.push(("limit", self.limit.to_string()));
        }
        pairs
    }

    // Filter setters reset the page; only `set_page` keeps the filters
    // and moves within the result set.

    pub fn set_search(&mut self, q: &str) {
        self.q = non_empty(q.trim());
        self.page = 1;
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category.and_then(|c| non_empty(c.trim()));
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 1;
    }

    /// Set the price range; a reversed range is swapped.
    pub fn set_price_range(&mut self, min: Option<Decimal>, max: Option<Decimal>) {
        (self.min_price, self.max_price) = match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
            other => other,
        };
        self.page = 1;
    }

    pub fn set_in_stock(&mut self, in_stock: bool) {
        self.in_stock = in_stock;
        self.page = 1;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.clamp(1, MAX_PAGE_SIZE);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Clear every filter, keeping the page size.
    pub fn clear_filters(&mut self) {
        *self = Self {
            limit: self.limit,
            ..Self::default()
        };
    }

    /// Whether any filter differs from the default listing.
    #[must_use]
    pub const fn has_filters(&self) -> bool {
        self.q.is_some()
            || self.category.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.in_stock
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Sort a grid in place. The sort is stable.
pub fn sort_products(products: &mut [Product], order: SortOrder) {
    match order {
        SortOrder::Newest => products.sort_by(|a, b| match (a.created_at, b.created_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortOrder::PriceAsc => products.sort_by_key(Product::effective_price),
        SortOrder::PriceDesc => {
            products.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()));
        }
        SortOrder::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortOrder::Name => products.sort_by_cached_key(|p| p.name.to_lowercase()),
    }
}

impl Pagination {
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Up to `width` page numbers centered on the current page.
    #[must_use]
    pub fn page_window(&self, width: u32) -> Vec<u32> {
        if self.total_pages == 0 || width == 0 {
            return Vec::new();
        }
        let width = width.min(self.total_pages);
        let current = self.page.clamp(1, self.total_pages);
        let start = current
            .saturating_sub(width / 2)
            .max(1)
            .min(self.total_pages - width + 1);
        (start..start + width).collect()
    }
}

/// One rendered page of a listing, kept in sync with upstream data.
#[derive(Debug, Clone)]
pub struct ListingView {
    query: ListingQuery,
    data: Synced<ProductPage>,
}

impl ListingView {
    #[must_use]
    pub fn new(query: ListingQuery, version: u64, page: ProductPage) -> Self {
        let mut view = Self {
            query,
            data: Synced::new(version, page),
        };
        view.apply_sort();
        view
    }

    /// Replace the grid when upstream data changes.
    pub fn reconcile(&mut self, version: u64, page: ProductPage) -> bool {
        let replaced = self.data.reconcile(version, page);
        if replaced {
            self.apply_sort();
        }
        replaced
    }

    /// Re-sort the rendered grid locally and reflect the order in the URL.
    pub fn sort_by(&mut self, order: SortOrder) {
        self.query.set_sort(order);
        self.apply_sort();
    }

    #[must_use]
    pub const fn query(&self) -> &ListingQuery {
        &self.query
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.data.value().products
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        self.data.value().pagination
    }

    /// Query string for a link to another page of the same listing.
    #[must_use]
    pub fn page_link(&self, page: u32) -> String {
        let mut query = self.query.clone();
        query.set_page(page);
        query.to_query_string()
    }

    fn apply_sort(&mut self) {
        let order = self.query.sort;
        sort_products(&mut self.data.value_mut().products, order);
    }
}
