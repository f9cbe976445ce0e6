//! Support ticket endpoints (`support`, `support/{id}`, `support/{id}/reply`).

use aurelle_core::TicketId;
use tracing::instrument;

use super::types::{NewTicketRequest, ReplyRequest, SupportTicket};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// List the customer's tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_tickets(&self) -> Result<Vec<SupportTicket>, ApiError> {
        self.get(&["support"], &[]).await
    }

    /// Fetch a ticket with its reply thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the ticket does not exist.
    #[instrument(skip(self), fields(ticket_id = %id))]
    pub async fn get_ticket(&self, id: &TicketId) -> Result<SupportTicket, ApiError> {
        self.get(&["support", id.as_str()], &[]).await
    }

    /// Open a new ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request))]
    pub async fn create_ticket(
        &self,
        request: &NewTicketRequest,
    ) -> Result<SupportTicket, ApiError> {
        self.post(&["support"], request).await
    }

    /// Reply to a ticket. Returns the ticket with the server's full thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request), fields(ticket_id = %id))]
    pub async fn reply_to_ticket(
        &self,
        id: &TicketId,
        request: &ReplyRequest,
    ) -> Result<SupportTicket, ApiError> {
        self.post(&["support", id.as_str(), "reply"], request).await
    }
}
