//! Support tickets.

use aurelle_core::{OrderId, TicketId};
use aurelle_storefront::api::{ApiClient, SupportTicket};
use aurelle_storefront::support::{TicketThread, open_ticket};

use super::{CliError, out};

/// List tickets.
pub async fn list(api: &ApiClient) -> Result<(), CliError> {
    let tickets = api.list_tickets().await?;
    if tickets.is_empty() {
        out("No tickets");
    }
    for ticket in &tickets {
        let status = format!("{:?}", ticket.status);
        out(format!("{}  {status:<10} {}", ticket.id, ticket.subject));
    }
    Ok(())
}

/// Open a ticket, optionally about an order.
pub async fn open(
    api: &ApiClient,
    subject: &str,
    message: &str,
    order: Option<String>,
) -> Result<(), CliError> {
    let ticket = open_ticket(api, subject, message, order.map(OrderId::from)).await?;
    out(format!("Opened ticket {}", ticket.id));
    Ok(())
}

/// Reply to a ticket and print the thread.
pub async fn reply(api: &ApiClient, id: &str, message: &str) -> Result<(), CliError> {
    let ticket = api.get_ticket(&TicketId::new(id)).await?;
    let mut thread = TicketThread::new(ticket);
    thread.reply(api, message).await?;
    print_thread(thread.ticket());
    Ok(())
}

fn print_thread(ticket: &SupportTicket) {
    out(format!("{} ({:?})", ticket.subject, ticket.status));
    for reply in &ticket.replies {
        out(format!(
            "  [{}] {:?}: {}",
            reply.created_at.format("%-d %b %H:%M"),
            reply.sender,
            reply.message
        ));
    }
}
