//! Order detail, tracking timeline and the review modal.
//!
//! Orders and shipments are rendered exactly as the backend sends them.

use std::future::Future;

use aurelle_core::{OrderId, Price, ProductId};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::{
    ApiClient, ApiError, Order, OrderItem, Review, ReviewRequest, Shipment, TrackingEvent,
};
use crate::notice::RequestFailure;

/// Longest review comment accepted, in characters.
pub const MAX_COMMENT_CHARS: usize = 1000;

// =============================================================================
// Order detail
// =============================================================================

/// Order detail with display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order: Order,
    pub status_label: &'static str,
    pub payment_label: &'static str,
    pub total_display: String,
    /// Whether the review button is shown for unreviewed items.
    pub can_review: bool,
}

impl From<Order> for OrderDetail {
    fn from(order: Order) -> Self {
        Self {
            status_label: order.status.label(),
            payment_label: order.payment_method.label(),
            total_display: Price::inr(order.total).display(),
            can_review: order.status.allows_review(),
            order,
        }
    }
}

/// Tracking events, newest first.
#[must_use]
pub fn timeline(shipment: &Shipment) -> Vec<TrackingEvent> {
    let mut events = shipment.events.clone();
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}

// =============================================================================
// Review modal
// =============================================================================

/// Backend operation used by [`ReviewModal`].
pub trait ReviewApi: Send + Sync {
    fn submit_review(
        &self,
        request: &ReviewRequest,
    ) -> impl Future<Output = Result<Review, ApiError>> + Send;
}

impl ReviewApi for ApiClient {
    fn submit_review(
        &self,
        request: &ReviewRequest,
    ) -> impl Future<Output = Result<Review, ApiError>> + Send {
        Self::submit_review(self, request)
    }
}

/// Review modal errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("No product selected for review")]
    NotOpen,

    #[error("Please choose a rating between 1 and 5")]
    InvalidRating(u8),

    #[error("Comment must be at most {MAX_COMMENT_CHARS} characters")]
    CommentTooLong(usize),

    #[error("This order cannot be reviewed yet")]
    NotDelivered,

    #[error("{}", .0.notice.message)]
    Request(RequestFailure),
}

/// The product the modal is open for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewTarget {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
}

/// Review submission modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewModal {
    target: Option<ReviewTarget>,
    submitting: bool,
    error: Option<String>,
}

impl ReviewModal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the modal for one item of a delivered order.
    ///
    /// # Errors
    ///
    /// Returns `NotDelivered` if the order status does not allow reviews.
    pub fn open(&mut self, order: &Order, item: &OrderItem) -> Result<(), ReviewError> {
        if !order.status.allows_review() {
            return Err(ReviewError::NotDelivered);
        }
        self.target = Some(ReviewTarget {
            order_id: order.id.clone(),
            product_id: item.product_id.clone(),
            product_name: item.name.clone(),
        });
        self.error = None;
        Ok(())
    }

    pub fn close(&mut self) {
        self.target = None;
        self.error = None;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub const fn target(&self) -> Option<&ReviewTarget> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate and submit. The modal closes on success.
    ///
    /// # Errors
    ///
    /// Validation failures return before any request. Backend failures
    /// are also kept in [`ReviewModal::error`].
    #[instrument(skip(self, api, comment))]
    pub async fn submit<A: ReviewApi>(
        &mut self,
        api: &A,
        rating: u8,
        comment: &str,
    ) -> Result<Review, ReviewError> {
        let target = self.target.clone().ok_or(ReviewError::NotOpen)?;
        let request = match validate_review(&target, rating, comment) {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.submitting = true;
        self.error = None;
        let result = api.submit_review(&request).await;
        self.submitting = false;

        match result {
            Ok(review) => {
                debug!(review_id = %review.id, "Review submitted");
                self.close();
                Ok(review)
            }
            Err(e) => {
                let failure = RequestFailure::from_api_error(&e, "Failed to submit review");
                self.error = Some(failure.notice.message.clone());
                Err(ReviewError::Request(failure))
            }
        }
    }
}

/// Build a review request, checking rating and comment length.
///
/// # Errors
///
/// Returns `InvalidRating` or `CommentTooLong`.
pub fn validate_review(
    target: &ReviewTarget,
    rating: u8,
    comment: &str,
) -> Result<ReviewRequest, ReviewError> {
    if !(1..=5).contains(&rating) {
        return Err(ReviewError::InvalidRating(rating));
    }
    let comment = comment.trim();
    let length = comment.chars().count();
    if length > MAX_COMMENT_CHARS {
        return Err(ReviewError::CommentTooLong(length));
    }
    Ok(ReviewRequest {
        product_id: target.product_id.clone(),
        order_id: target.order_id.clone(),
        rating,
        comment: comment.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use aurelle_core::{OrderStatus, ReviewId};

    use super::*;

    fn order(status: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "_id": "o1",
            "items": [{ "productId": "p1", "name": "Rose Toner", "quantity": 1, "price": "499" }],
            "status": status,
            "paymentMethod": "cod",
            "shippingAddress": { "addressLine1": "12 Carter Road", "city": "Mumbai" },
            "total": "548.00",
            "createdAt": "2026-02-01T09:00:00Z"
        }))
        .unwrap()
    }

    #[derive(Default)]
    struct FakeReviews {
        fail: bool,
        seen: Mutex<Vec<ReviewRequest>>,
    }

    impl ReviewApi for FakeReviews {
        fn submit_review(
            &self,
            request: &ReviewRequest,
        ) -> impl Future<Output = Result<Review, ApiError>> + Send {
            self.seen.lock().unwrap().push(request.clone());
            let result = if self.fail {
                Err(ApiError::Rejected {
                    status: 409,
                    message: Some("You already reviewed this product".to_string()),
                    code: Some("DUPLICATE".to_string()),
                })
            } else {
                Ok(Review {
                    id: ReviewId::new("r1"),
                    product_id: request.product_id.clone(),
                    rating: request.rating,
                    comment: request.comment.clone(),
                    created_at: None,
                })
            };
            async move { result }
        }
    }

    #[test]
    fn test_order_detail_labels() {
        let detail = OrderDetail::from(order("delivered"));
        assert_eq!(detail.order.status, OrderStatus::Delivered);
        assert_eq!(detail.status_label, "Delivered");
        assert_eq!(detail.total_display, "₹548.00");
        assert!(detail.can_review);
    }

    #[test]
    fn test_timeline_is_newest_first() {
        let shipment: Shipment = serde_json::from_value(serde_json::json!({
            "courier": "Delhivery", "awb": "123", "status": "in_transit",
            "events": [
                { "status": "Picked up", "timestamp": "2026-02-02T10:00:00Z" },
                { "status": "In transit", "timestamp": "2026-02-03T10:00:00Z", "location": "Pune" },
                { "status": "Manifested", "timestamp": "2026-02-01T10:00:00Z" }
            ]
        }))
        .unwrap();
        let statuses: Vec<_> = timeline(&shipment).into_iter().map(|e| e.status).collect();
        assert_eq!(statuses, vec!["In transit", "Picked up", "Manifested"]);
    }

    #[test]
    fn test_cannot_open_for_undelivered_order() {
        let order = order("shipped");
        let mut modal = ReviewModal::new();
        assert_eq!(modal.open(&order, &order.items[0]), Err(ReviewError::NotDelivered));
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn test_invalid_rating_blocks_request() {
        let order = order("delivered");
        let mut modal = ReviewModal::new();
        modal.open(&order, &order.items[0]).unwrap();
        let api = FakeReviews::default();

        let err = modal.submit(&api, 0, "Lovely").await.unwrap_err();

        assert_eq!(err, ReviewError::InvalidRating(0));
        assert!(modal.error().is_some());
        assert!(modal.is_open());
        assert!(api.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_comment_blocks_request() {
        let order = order("delivered");
        let mut modal = ReviewModal::new();
        modal.open(&order, &order.items[0]).unwrap();
        let api = FakeReviews::default();

        let comment = "a".repeat(MAX_COMMENT_CHARS + 1);
        let err = modal.submit(&api, 5, &comment).await.unwrap_err();

        assert_eq!(err, ReviewError::CommentTooLong(MAX_COMMENT_CHARS + 1));
        assert!(api.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_closes_modal() {
        let order = order("delivered");
        let mut modal = ReviewModal::new();
        modal.open(&order, &order.items[0]).unwrap();
        let api = FakeReviews::default();

        let review = modal.submit(&api, 5, "  Calms my skin ").await.unwrap();

        assert_eq!(review.comment, "Calms my skin");
        assert!(!modal.is_open());
        let seen = api.seen.lock().unwrap();
        assert_eq!(seen[0].order_id, OrderId::new("o1"));
        assert_eq!(seen[0].rating, 5);
    }

    #[tokio::test]
    async fn test_server_error_lands_in_modal() {
        let order = order("delivered");
        let mut modal = ReviewModal::new();
        modal.open(&order, &order.items[0]).unwrap();
        let api = FakeReviews {
            fail: true,
            ..FakeReviews::default()
        };

        modal.submit(&api, 4, "").await.unwrap_err();

        assert_eq!(modal.error(), Some("You already reviewed this product"));
        assert!(modal.is_open());
        assert!(!modal.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_without_target() {
        let mut modal = ReviewModal::new();
        let err = modal.submit(&FakeReviews::default(), 5, "").await.unwrap_err();
        assert_eq!(err, ReviewError::NotOpen);
    }
}
