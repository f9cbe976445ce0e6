//! Support ticket handlers.

use aurelle_core::{OrderId, TicketId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::SupportTicket;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::VisitorSession;
use crate::notice::Notice;
use crate::state::AppState;
use crate::support::{TicketThread, open_ticket};

use super::Envelope;

/// In-flight action name for ticket writes.
const SUPPORT_ACTION: &str = "support";

/// New ticket form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicketForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

/// Reply form.
#[derive(Debug, Deserialize)]
pub struct ReplyForm {
    #[serde(default)]
    pub message: String,
}

/// The visitor's tickets.
///
/// # Errors
///
/// Returns an error if the backend call fails.
#[instrument(skip_all)]
pub async fn index(RequireAuth(api): RequireAuth) -> Result<Json<Envelope<Vec<SupportTicket>>>> {
    Ok(Envelope::ok(api.list_tickets().await?))
}

/// Open a ticket.
///
/// # Errors
///
/// Returns 422 for a blank subject or message, or the backend's error.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(api): RequireAuth,
    session: VisitorSession,
    Json(form): Json<NewTicketForm>,
) -> Result<(StatusCode, Json<Envelope<SupportTicket>>)> {
    let visitor = session.visitor_id().await?;
    let _ticket = state
        .in_flight()
        .try_begin(&visitor, SUPPORT_ACTION)
        .ok_or_else(|| AppError::Conflict("Your message is already being sent".to_string()))?;

    let ticket = open_ticket(&api, &form.subject, &form.message, form.order_id).await?;
    Ok((
        StatusCode::CREATED,
        Envelope::with_notice(ticket, Notice::success("Ticket created")),
    ))
}

/// One ticket with its reply thread.
///
/// # Errors
///
/// Returns 404 if the ticket doesn't exist.
#[instrument(skip(api))]
pub async fn show(
    RequireAuth(api): RequireAuth,
    Path(id): Path<TicketId>,
) -> Result<Json<Envelope<TicketThread>>> {
    Ok(Envelope::ok(TicketThread::new(api.get_ticket(&id).await?)))
}

/// Reply to a ticket. The response carries the server's thread.
///
/// # Errors
///
/// Returns 422 for a blank message, 400 for a closed ticket, or the
/// backend's error.
#[instrument(skip(state, api, session, form), fields(ticket_id = %id))]
pub async fn reply(
    State(state): State<AppState>,
    RequireAuth(api): RequireAuth,
    session: VisitorSession,
    Path(id): Path<TicketId>,
    Json(form): Json<ReplyForm>,
) -> Result<Json<Envelope<TicketThread>>> {
    let visitor = session.visitor_id().await?;
    let _ticket = state
        .in_flight()
        .try_begin(&visitor, SUPPORT_ACTION)
        .ok_or_else(|| AppError::Conflict("Your message is already being sent".to_string()))?;

    let mut thread = TicketThread::new(api.get_ticket(&id).await?);
    thread.reply(&api, &form.message).await?;
    Ok(Envelope::with_notice(thread, Notice::success("Reply sent")))
}
