//! Product and category reads.
//!
//! Product detail and the category list are cached; listings and search
//! results depend on the query string and always go to the backend.

use tracing::{debug, instrument};

use super::cache::{CATEGORIES_KEY, CacheValue, product_key};
use super::types::{Category, Product, ProductPage};
use super::{ApiClient, ApiError};
use crate::listing::ListingQuery;

impl ApiClient {
    /// Fetch one page of products matching the listing filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(page = query.page))]
    pub async fn list_products(&self, query: &ListingQuery) -> Result<ProductPage, ApiError> {
        self.get(&["product"], &query.api_params()).await
    }

    /// Search products by free text, returning at most `limit` results.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str, limit: u32) -> Result<Vec<Product>, ApiError> {
        let params = [
            ("search", query.to_string()),
            ("limit", limit.to_string()),
            ("page", "1".to_string()),
        ];
        let page: ProductPage = self.get(&["product"], &params).await?;
        Ok(page.products)
    }

    /// Fetch a product by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    #[instrument(skip(self))]
    pub async fn get_product(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = product_key(slug);

        if let Some(CacheValue::Product(product)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get(&["product", slug], &[]).await?;

        self.cache()
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Fetch every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) = self.cache().get(CATEGORIES_KEY).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get(&["category"], &[]).await?;

        self.cache()
            .insert(
                CATEGORIES_KEY.to_string(),
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Drop every cached catalog entry.
    pub async fn invalidate_catalog_cache(&self) {
        self.cache().invalidate_all();
        self.cache().run_pending_tasks().await;
    }
}
