//! Order history and tracking.

use aurelle_core::{OrderId, Price};
use aurelle_storefront::api::ApiClient;
use aurelle_storefront::orders::{OrderDetail, timeline};

use super::{CliError, out};

/// List one page of orders.
pub async fn list(api: &ApiClient, page: u32) -> Result<(), CliError> {
    let history = api.list_orders(page.max(1)).await?;
    if history.orders.is_empty() {
        out("No orders yet");
        return Ok(());
    }
    for order in history.orders {
        let detail = OrderDetail::from(order);
        out(format!(
            "{}  {:<12} {:>10}  {}",
            detail.order.id,
            detail.status_label,
            detail.total_display,
            detail.order.created_at.format("%-d %b %Y")
        ));
    }
    out(format!(
        "Page {} of {}",
        history.pagination.page, history.pagination.total_pages
    ));
    Ok(())
}

/// Show one order.
pub async fn show(api: &ApiClient, id: &str) -> Result<(), CliError> {
    let detail = OrderDetail::from(api.get_order(&OrderId::new(id)).await?);
    let order = &detail.order;

    out(format!(
        "Order {} ({})",
        order.order_number.as_deref().unwrap_or(order.id.as_str()),
        detail.status_label
    ));
    out(format!("Placed {}", order.created_at.format("%-d %B %Y %H:%M")));
    out(format!("Payment: {}", detail.payment_label));
    out(format!("Ship to: {}", order.shipping_address.one_line()));
    for item in &order.items {
        let reviewed = if item.reviewed {
            " (reviewed)"
        } else if detail.can_review {
            " (review pending)"
        } else {
            ""
        };
        out(format!(
            "  {} x{} {}{reviewed}",
            item.name,
            item.quantity,
            Price::inr(item.price).display()
        ));
    }
    out(format!("Total: {}", detail.total_display));
    Ok(())
}

/// Show the tracking timeline, newest first.
pub async fn track(api: &ApiClient, id: &str) -> Result<(), CliError> {
    let shipment = api.get_tracking(&OrderId::new(id)).await?;
    out(format!(
        "{} AWB {} ({:?})",
        shipment.courier, shipment.awb, shipment.status
    ));
    if let Some(eta) = shipment.estimated_delivery {
        out(format!("Estimated delivery: {}", eta.format("%-d %B %Y")));
    }
    for event in timeline(&shipment) {
        out(format!(
            "  {}  {}{}",
            event.timestamp.format("%-d %b %H:%M"),
            event.status,
            event
                .location
                .as_deref()
                .map(|l| format!(" - {l}"))
                .unwrap_or_default()
        ));
    }
    Ok(())
}
