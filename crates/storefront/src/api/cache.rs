//! Cache types for catalog responses.

use super::types::{Category, Product};

/// Cache key for the category list.
pub(super) const CATEGORIES_KEY: &str = "categories";

/// Cache key for a product detail page.
pub(super) fn product_key(slug: &str) -> String {
    format!("product:{slug}")
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Vec<Category>),
    Product(Box<Product>),
}
