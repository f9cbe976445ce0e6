//! Cart endpoints (`cart`, `cart/add`).

use tracing::instrument;

use super::types::{AddToCartRequest, Cart};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetch the visitor's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Cart, ApiError> {
        self.get(&["cart"], &[]).await
    }

    /// Add a product to the cart and return the updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it
    /// (for example when the product is out of stock).
    #[instrument(
        skip(self, request),
        fields(product_id = %request.product_id, quantity = request.quantity)
    )]
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<Cart, ApiError> {
        self.post(&["cart", "add"], request).await
    }
}
