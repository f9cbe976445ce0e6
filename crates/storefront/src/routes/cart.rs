//! Cart handlers.

use aurelle_core::ProductId;
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use crate::api::AddToCartRequest;
use crate::cart::{CartView, check_quantity};
use crate::error::{AppError, Result};
use crate::form::FieldErrors;
use crate::middleware::VisitorApi;
use crate::notice::Notice;

use super::Envelope;

/// Add-to-cart form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemForm {
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// The visitor's cart.
///
/// # Errors
///
/// Returns an error if the backend call fails.
#[instrument(skip(api))]
pub async fn show(VisitorApi(api): VisitorApi) -> Result<Json<Envelope<CartView>>> {
    Ok(Envelope::ok(api.get_cart().await?.into()))
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns 422 for an out-of-range quantity, or the backend's error.
#[instrument(skip(api))]
pub async fn add(
    VisitorApi(api): VisitorApi,
    Json(form): Json<AddItemForm>,
) -> Result<Json<Envelope<CartView>>> {
    let quantity = check_quantity(form.quantity).map_err(|message| {
        let mut errors = FieldErrors::new();
        errors.insert("quantity", message.clone());
        AppError::validation(message, &errors)
    })?;

    let cart = api
        .add_to_cart(&AddToCartRequest::new(form.product_id, quantity))
        .await
        .map_err(|e| AppError::upstream(&e, Notice::from_api_error(&e, "Failed to add to cart")))?;

    Ok(Envelope::with_notice(cart.into(), Notice::success("Added to cart")))
}
