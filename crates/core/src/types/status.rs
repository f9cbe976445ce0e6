//! Status enums for orders, payments, shipments and support tickets.
//!
//! Values mirror the backend's lowercase strings. Statuses the backend adds
//! later deserialize as `Unknown` instead of failing the whole page.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Human-readable label for order pages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Returned => "Returned",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether products in this order can be reviewed.
    #[must_use]
    pub const fn allows_review(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Prepaid through the payment gateway.
    #[default]
    Online,
    /// Cash on delivery.
    Cod,
}

impl PaymentMethod {
    /// Label shown on the review step.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Online => "Pay online",
            Self::Cod => "Cash on delivery",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Cod => write!(f, "cod"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "cod" => Ok(Self::Cod),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Courier shipment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Created,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Rto,
    #[serde(other)]
    Unknown,
}

/// Support ticket status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
    #[serde(other)]
    Unknown,
}

impl TicketStatus {
    /// Whether the customer can still reply to the thread.
    #[must_use]
    pub const fn accepts_replies(self) -> bool {
        !matches!(self, Self::Closed)
    }
}
