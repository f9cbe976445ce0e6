//! Order, tracking and review endpoints.

use aurelle_core::OrderId;
use tracing::instrument;

use super::types::{
    CreateOrderRequest, Order, OrderPage, PlacedOrder, Review, ReviewRequest, Shipment,
};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Place an order.
    ///
    /// `idempotency_key` is sent as the `Idempotency-Key` header so the
    /// backend can collapse a repeated submission into one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request), fields(payment_method = %request.payment_method))]
    pub async fn place_order(
        &self,
        request: &CreateOrderRequest,
        idempotency_key: &str,
    ) -> Result<PlacedOrder, ApiError> {
        self.post_idempotent(&["order"], request, idempotency_key)
            .await
    }

    /// Fetch one page of the order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, page: u32) -> Result<OrderPage, ApiError> {
        self.get(&["order"], &[("page", page.max(1).to_string())])
            .await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.get(&["order", id.as_str()], &[]).await
    }

    /// Fetch the shipment for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order has no shipment.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_tracking(&self, id: &OrderId) -> Result<Shipment, ApiError> {
        self.get(&["order", id.as_str(), "tracking"], &[]).await
    }

    /// Submit a product review for a delivered order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(
        skip(self, request),
        fields(product_id = %request.product_id, rating = request.rating)
    )]
    pub async fn submit_review(&self, request: &ReviewRequest) -> Result<Review, ApiError> {
        self.post(&["product", "review"], request).await
    }
}
