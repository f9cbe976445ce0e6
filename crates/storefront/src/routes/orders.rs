//! Order history, detail, tracking and review handlers.

use aurelle_core::{OrderId, ProductId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::{Pagination, Review, Shipment, TrackingEvent};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::VisitorSession;
use crate::notice::Notice;
use crate::orders::{OrderDetail, ReviewModal, timeline};
use crate::state::AppState;

use super::Envelope;

/// In-flight action name for review submission.
const REVIEW_ACTION: &str = "review";

/// Order history query.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "first_page")]
    pub page: u32,
}

const fn first_page() -> u32 {
    1
}

/// One page of order history.
#[derive(Debug, Serialize)]
pub struct OrderHistory {
    pub orders: Vec<OrderDetail>,
    pub pagination: Pagination,
}

/// Shipment with its events newest first.
#[derive(Debug, Serialize)]
pub struct TrackingPage {
    pub shipment: Shipment,
    pub timeline: Vec<TrackingEvent>,
}

/// Review form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    pub product_id: ProductId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Order history.
///
/// # Errors
///
/// Returns an error if the backend call fails.
#[instrument(skip(api))]
pub async fn index(
    RequireAuth(api): RequireAuth,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Envelope<OrderHistory>>> {
    let page = api.list_orders(params.page).await?;
    Ok(Envelope::ok(OrderHistory {
        orders: page.orders.into_iter().map(OrderDetail::from).collect(),
        pagination: page.pagination,
    }))
}

/// Order detail.
///
/// # Errors
///
/// Returns 404 if the order doesn't exist.
#[instrument(skip(api))]
pub async fn show(
    RequireAuth(api): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Envelope<OrderDetail>>> {
    Ok(Envelope::ok(api.get_order(&id).await?.into()))
}

/// Tracking timeline.
///
/// # Errors
///
/// Returns 404 if the order has no shipment yet.
#[instrument(skip(api))]
pub async fn tracking(
    RequireAuth(api): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Envelope<TrackingPage>>> {
    let shipment = api.get_tracking(&id).await?;
    Ok(Envelope::ok(TrackingPage {
        timeline: timeline(&shipment),
        shipment,
    }))
}

/// Review one product of a delivered order.
///
/// # Errors
///
/// Returns 404 if the product is not part of the order, 400 if the order
/// is not delivered, 422 for an invalid rating or comment, or the
/// backend's error.
#[instrument(skip(state, api, session, form), fields(order_id = %id))]
pub async fn review(
    State(state): State<AppState>,
    RequireAuth(api): RequireAuth,
    session: VisitorSession,
    Path(id): Path<OrderId>,
    Json(form): Json<ReviewForm>,
) -> Result<(StatusCode, Json<Envelope<Review>>)> {
    let visitor = session.visitor_id().await?;
    let _ticket = state
        .in_flight()
        .try_begin(&visitor, REVIEW_ACTION)
        .ok_or_else(|| AppError::Conflict("Your review is already being submitted".to_string()))?;

    let order = api.get_order(&id).await?;
    let item = order
        .items
        .iter()
        .find(|item| item.product_id == form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {} in order {id}", form.product_id)))?;

    let mut modal = ReviewModal::new();
    modal.open(&order, item)?;
    let review = modal.submit(&api, form.rating, &form.comment).await?;

    Ok((
        StatusCode::CREATED,
        Envelope::with_notice(review, Notice::success("Thanks for your review")),
    ))
}
