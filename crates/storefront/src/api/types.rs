//! Wire types for the backend REST API.
//!
//! Field names follow the backend's JSON (camelCase keys, `_id` for ids).
//! Amounts are decimals computed by the backend and are never recomputed
//! here.

use aurelle_core::{
    Address, AddressId, CategoryId, OrderId, OrderStatus, PaymentMethod,
    PaymentStatus, ProductId, ReplyId, ReviewId, ShipmentStatus, TicketId, TicketStatus, UserId,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A product's category, either populated or as a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated(Category),
    Id(CategoryId),
}

impl CategoryRef {
    /// Display name, if the category was populated.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated(category) => Some(&category.name),
            Self::Id(_) => None,
        }
    }
}

/// A purchasable variant (size, shade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: u32,
}

/// A product as shown in grids and on its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ProductVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The price the customer pays: the sale price when present.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// First image, used as the grid thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Pagination metadata for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            total: 0,
            total_pages: 0,
        }
    }
}

/// One page of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Pagination,
}

// =============================================================================
// Cart
// =============================================================================

/// A line in the visitor's cart, as supplied by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<String>,
    pub item_total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Backend-computed subtotal, when the backend sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
}

/// Body for `POST cart/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<String>,
}

impl AddToCartRequest {
    /// Add `quantity` units of a product without a variant.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
            selected_variant: None,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Contact details collected on the first checkout step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// An address copied into an order at the time it was placed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSnapshot {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl AddressSnapshot {
    /// Single-line rendering for summaries.
    #[must_use]
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address_line1.as_str()];
        if let Some(line2) = self.address_line2.as_deref().filter(|l| !l.is_empty()) {
            parts.push(line2);
        }
        parts.extend([self.city.as_str(), self.state.as_str(), self.postal_code.as_str()]);
        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }
}

impl From<&Address> for AddressSnapshot {
    fn from(address: &Address) -> Self {
        Self {
            title: address.title.clone(),
            address_line1: address.address_line1.clone(),
            address_line2: address.address_line2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            landmark: address.landmark.clone(),
        }
    }
}

/// Body for `POST order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_id: Option<AddressId>,
    pub contact: ContactDetails,
    pub shipping_address: AddressSnapshot,
    pub billing_address: AddressSnapshot,
    pub same_as_shipping: bool,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Razorpay order created by the backend for online payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RazorpayOrder {
    pub id: String,
    /// Amount in the smallest currency unit (paise).
    pub amount: u64,
    pub currency: String,
}

/// Response to a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_order: Option<RazorpayOrder>,
}

/// A line item inside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the customer already reviewed this product for this order.
    #[serde(default)]
    pub reviewed: bool,
}

/// A placed order. Totals are rendered as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub shipping_address: AddressSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<AddressSnapshot>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One page of the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub pagination: Pagination,
}

// =============================================================================
// Tracking
// =============================================================================

/// One scan in a shipment's journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Courier shipment for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub courier: String,
    pub awb: String,
    #[serde(default)]
    pub status: ShipmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
    #[serde(default)]
    pub events: Vec<TrackingEvent>,
}

// =============================================================================
// Reviews
// =============================================================================

/// Body for `POST product/review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub product_id: ProductId,
    pub order_id: OrderId,
    pub rating: u8,
    pub comment: String,
}

/// A stored product review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub product_id: ProductId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Support
// =============================================================================

/// Who wrote a reply in a ticket thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplySender {
    #[default]
    Customer,
    Support,
}

/// One message in a ticket thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReplyId>,
    pub message: String,
    #[serde(default)]
    pub sender: ReplySender,
    pub created_at: DateTime<Utc>,
}

/// A support ticket with its reply thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    #[serde(rename = "_id")]
    pub id: TicketId,
    pub subject: String,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for `POST support`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicketRequest {
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

/// Body for `POST support/{id}/reply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
}

// =============================================================================
// Profile
// =============================================================================

/// The signed-in customer's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body for `PATCH profile`. Only present fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfilePatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Address list payload (`{ addresses: [...] }`).
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct AddressList {
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_product_accepts_populated_or_bare_category() {
        let populated = serde_json::json!({
            "_id": "p1", "name": "Rose Toner", "slug": "rose-toner", "price": "499",
            "category": { "_id": "c1", "name": "Toners", "slug": "toners" }
        });
        let product: Product = serde_json::from_value(populated).unwrap();
        assert_eq!(product.category.as_ref().and_then(CategoryRef::name), Some("Toners"));

        let bare = serde_json::json!({
            "_id": "p2", "name": "Clay Mask", "slug": "clay-mask", "price": 799,
            "category": "c2"
        });
        let product: Product = serde_json::from_value(bare).unwrap();
        assert_eq!(product.category, Some(CategoryRef::Id(CategoryId::new("c2"))));
        assert!(!product.in_stock());
    }

    #[test]
    fn test_effective_price_prefers_sale_price() {
        let json = serde_json::json!({
            "_id": "p1", "name": "Serum", "slug": "serum",
            "price": "1299.00", "salePrice": "999.00", "stock": 4
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.effective_price(), dec("999.00"));
        assert!(product.in_stock());
    }

    #[test]
    fn test_create_order_request_wire_format() {
        let request = CreateOrderRequest {
            address_id: Some(AddressId::new("a1")),
            contact: ContactDetails {
                full_name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
            },
            shipping_address: AddressSnapshot::default(),
            billing_address: AddressSnapshot::default(),
            same_as_shipping: true,
            payment_method: PaymentMethod::Cod,
            notes: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["addressId"], "a1");
        assert_eq!(json["contact"]["fullName"], "Asha Rao");
        assert_eq!(json["sameAsShipping"], true);
        assert_eq!(json["paymentMethod"], "cod");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_snapshot_one_line_skips_empty_parts() {
        let snapshot = AddressSnapshot {
            address_line1: "12 Carter Road".to_string(),
            city: "Mumbai".to_string(),
            state: "Maharashtra".to_string(),
            postal_code: "400050".to_string(),
            ..AddressSnapshot::default()
        };
        assert_eq!(snapshot.one_line(), "12 Carter Road, Mumbai, Maharashtra, 400050");
    }

    #[test]
    fn test_profile_patch_skips_unchanged_fields() {
        let patch = ProfilePatch {
            phone: Some("9000000000".to_string()),
            ..ProfilePatch::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "phone": "9000000000" })
        );
        assert!(ProfilePatch::default().is_empty());
    }

    #[test]
    fn test_ticket_reply_sender() {
        let json = serde_json::json!({
            "_id": "t1", "subject": "Damaged bottle", "status": "in_progress",
            "replies": [
                { "message": "Hi", "sender": "customer", "createdAt": "2026-01-02T10:00:00Z" },
                { "message": "Sorry!", "sender": "support", "createdAt": "2026-01-02T11:00:00Z" }
            ],
            "createdAt": "2026-01-02T10:00:00Z"
        });
        let ticket: SupportTicket = serde_json::from_value(json).unwrap();
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.replies[1].sender, ReplySender::Support);
    }
}
