//! Cart view.
//!
//! The cart is owned by the backend. The storefront shows its lines and a
//! display sum of the backend's line totals; it never prices anything.

use rust_decimal::Decimal;
use serde::Serialize;

use aurelle_core::Price;

use crate::api::{Cart, CartItem};

/// Maximum quantity accepted by add-to-cart in one request.
pub const MAX_QUANTITY: u32 = 10;

/// Sum of the backend's `itemTotal`s.
#[must_use]
pub fn items_total(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.item_total).sum()
}

/// What the cart drawer and page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    /// Total number of units.
    pub item_count: u32,
    pub subtotal: Decimal,
    pub subtotal_display: String,
    pub is_empty: bool,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let subtotal = cart.subtotal.unwrap_or_else(|| items_total(&cart.items));
        Self {
            item_count: cart.items.iter().map(|i| i.quantity).sum(),
            subtotal,
            subtotal_display: Price::inr(subtotal).display(),
            is_empty: cart.items.is_empty(),
            items: cart.items,
        }
    }
}

/// Check an add-to-cart quantity.
///
/// # Errors
///
/// Returns the message to show if the quantity is out of range.
pub fn check_quantity(quantity: u32) -> Result<u32, String> {
    if quantity == 0 {
        Err("Quantity must be at least 1".to_string())
    } else if quantity > MAX_QUANTITY {
        Err(format!("You can add at most {MAX_QUANTITY} at a time"))
    } else {
        Ok(quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aurelle_core::ProductId;

    use super::*;

    fn item(total: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new("p1"),
            name: "Clay Mask".to_string(),
            quantity,
            selected_variant: Some("50ml".to_string()),
            item_total: total.parse().unwrap(),
            image: None,
        }
    }

    #[test]
    fn test_view_sums_line_totals() {
        let view = CartView::from(Cart {
            items: vec![item("799.00", 1), item("998.00", 2)],
            subtotal: None,
        });
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal_display, "₹1797.00");
        assert!(!view.is_empty);
    }

    #[test]
    fn test_view_prefers_backend_subtotal() {
        let view = CartView::from(Cart {
            items: vec![item("799.00", 1)],
            subtotal: Some("699.00".parse().unwrap()),
        });
        assert_eq!(view.subtotal, "699.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_empty_cart() {
        let view = CartView::from(Cart::default());
        assert!(view.is_empty);
        assert_eq!(view.subtotal_display, "₹0.00");
    }

    #[test]
    fn test_check_quantity() {
        assert!(check_quantity(0).is_err());
        assert_eq!(check_quantity(3), Ok(3));
        assert!(check_quantity(MAX_QUANTITY + 1).is_err());
    }
}
