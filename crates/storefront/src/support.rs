//! Support tickets and their reply thread.
//!
//! The thread is loaded once and refreshed only after the customer's own
//! reply, by replacing the local replies with the server's list. Nothing
//! is merged optimistically and nothing polls.

use std::future::Future;

use aurelle_core::{OrderId, TicketId};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, NewTicketRequest, Reply, ReplyRequest, SupportTicket};
use crate::form::FieldErrors;
use crate::notice::RequestFailure;

/// Longest subject accepted, in characters.
pub const MAX_SUBJECT_CHARS: usize = 150;

/// Backend operations used by the support pages.
pub trait SupportApi: Send + Sync {
    fn create_ticket(
        &self,
        request: &NewTicketRequest,
    ) -> impl Future<Output = Result<SupportTicket, ApiError>> + Send;

    fn reply_to_ticket(
        &self,
        id: &TicketId,
        request: &ReplyRequest,
    ) -> impl Future<Output = Result<SupportTicket, ApiError>> + Send;
}

impl SupportApi for ApiClient {
    fn create_ticket(
        &self,
        request: &NewTicketRequest,
    ) -> impl Future<Output = Result<SupportTicket, ApiError>> + Send {
        Self::create_ticket(self, request)
    }

    fn reply_to_ticket(
        &self,
        id: &TicketId,
        request: &ReplyRequest,
    ) -> impl Future<Output = Result<SupportTicket, ApiError>> + Send {
        Self::reply_to_ticket(self, id, request)
    }
}

/// Support errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SupportError {
    #[error("Invalid ticket: {0}")]
    Invalid(FieldErrors),

    #[error("This ticket is closed")]
    Closed,

    #[error("{}", .0.notice.message)]
    Request(RequestFailure),
}

/// Validate a new ticket.
///
/// # Errors
///
/// Returns field errors if the subject or message is blank or the subject
/// is too long.
pub fn validate_new_ticket(
    subject: &str,
    message: &str,
    order_id: Option<OrderId>,
) -> Result<NewTicketRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require("subject", subject, "Subject is required");
    errors.require("message", message, "Message is required");
    if subject.trim().chars().count() > MAX_SUBJECT_CHARS {
        errors.insert(
            "subject",
            format!("Subject must be at most {MAX_SUBJECT_CHARS} characters"),
        );
    }

    errors.into_result(NewTicketRequest {
        subject: subject.trim().to_string(),
        message: message.trim().to_string(),
        order_id,
    })
}

/// Open a ticket.
///
/// # Errors
///
/// Returns `Invalid` before any request, or `Request` if the backend call
/// fails.
#[instrument(skip_all)]
pub async fn open_ticket<A: SupportApi>(
    api: &A,
    subject: &str,
    message: &str,
    order_id: Option<OrderId>,
) -> Result<SupportTicket, SupportError> {
    let request = validate_new_ticket(subject, message, order_id).map_err(SupportError::Invalid)?;
    api.create_ticket(&request).await.map_err(|e| {
        SupportError::Request(RequestFailure::from_api_error(&e, "Failed to create ticket"))
    })
}

/// An open ticket page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketThread {
    ticket: SupportTicket,
    sending: bool,
    error: Option<String>,
}

impl TicketThread {
    #[must_use]
    pub const fn new(ticket: SupportTicket) -> Self {
        Self {
            ticket,
            sending: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn ticket(&self) -> &SupportTicket {
        &self.ticket
    }

    #[must_use]
    pub fn replies(&self) -> &[Reply] {
        &self.ticket.replies
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_sending(&self) -> bool {
        self.sending
    }

    #[must_use]
    pub fn into_ticket(self) -> SupportTicket {
        self.ticket
    }

    /// Send a reply. On success the local thread becomes the server's.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for a blank message, `Closed` for a closed ticket,
    /// or `Request` if the backend call fails.
    #[instrument(skip_all, fields(ticket_id = %self.ticket.id))]
    pub async fn reply<A: SupportApi>(
        &mut self,
        api: &A,
        message: &str,
    ) -> Result<&[Reply], SupportError> {
        let mut errors = FieldErrors::new();
        errors.require("message", message, "Message is required");
        if !errors.is_empty() {
            return Err(SupportError::Invalid(errors));
        }
        if !self.ticket.status.accepts_replies() {
            return Err(SupportError::Closed);
        }

        self.sending = true;
        self.error = None;
        let request = ReplyRequest {
            message: message.trim().to_string(),
        };
        let result = api.reply_to_ticket(&self.ticket.id, &request).await;
        self.sending = false;

        match result {
            Ok(updated) => {
                self.ticket.replies = updated.replies;
                self.ticket.status = updated.status;
                self.ticket.updated_at = updated.updated_at;
                Ok(&self.ticket.replies)
            }
            Err(e) => {
                let failure = RequestFailure::from_api_error(&e, "Failed to send reply");
                self.error = Some(failure.notice.message.clone());
                Err(SupportError::Request(failure))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use aurelle_core::TicketStatus;

    use super::*;

    fn ticket(status: &str, replies: serde_json::Value) -> SupportTicket {
        serde_json::from_value(serde_json::json!({
            "_id": "t1", "subject": "Damaged bottle", "status": status,
            "replies": replies, "createdAt": "2026-03-01T10:00:00Z"
        }))
        .unwrap()
    }

    /// Replies with a server thread that differs from anything the client
    /// could have guessed.
    struct FakeSupport {
        fail: bool,
        sent: Mutex<Vec<String>>,
    }

    impl SupportApi for FakeSupport {
        fn create_ticket(
            &self,
            request: &NewTicketRequest,
        ) -> impl Future<Output = Result<SupportTicket, ApiError>> + Send {
            self.sent.lock().unwrap().push(request.subject.clone());
            let result = Ok(SupportTicket {
                subject: request.subject.clone(),
                ..ticket("open", serde_json::json!([]))
            });
            async move { result }
        }

        fn reply_to_ticket(
            &self,
            _id: &TicketId,
            request: &ReplyRequest,
        ) -> impl Future<Output = Result<SupportTicket, ApiError>> + Send {
            self.sent.lock().unwrap().push(request.message.clone());
            let result = if self.fail {
                Err(ApiError::Rejected {
                    status: 500,
                    message: None,
                    code: None,
                })
            } else {
                Ok(ticket(
                    "in_progress",
                    serde_json::json!([
                        {
                            "message": "It arrived cracked",
                            "sender": "customer",
                            "createdAt": "2026-03-01T10:00:00Z"
                        },
                        {
                            "message": "Sorry! A replacement is on its way.",
                            "sender": "support",
                            "createdAt": "2026-03-01T11:00:00Z"
                        },
                        {
                            "message": request.message,
                            "sender": "customer",
                            "createdAt": "2026-03-01T12:00:00Z"
                        }
                    ]),
                ))
            };
            async move { result }
        }
    }

    fn fake(fail: bool) -> FakeSupport {
        FakeSupport {
            fail,
            sent: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn test_new_ticket_validation() {
        let errors = validate_new_ticket(" ", "", None).unwrap_err();
        assert_eq!(errors.len(), 2);

        let long = "x".repeat(MAX_SUBJECT_CHARS + 1);
        let errors = validate_new_ticket(&long, "Help", None).unwrap_err();
        assert!(errors.get("subject").unwrap().contains("at most"));

        let request =
            validate_new_ticket(" Late delivery ", " Where is it? ", Some(OrderId::new("o1")))
                .unwrap();
        assert_eq!(request.subject, "Late delivery");
        assert_eq!(request.message, "Where is it?");
    }

    #[tokio::test]
    async fn test_open_ticket_blank_never_calls_backend() {
        let api = fake(false);
        let err = open_ticket(&api, "", "", None).await.unwrap_err();
        assert!(matches!(err, SupportError::Invalid(_)));
        assert!(api.sent.lock().unwrap().is_empty());

        let created = open_ticket(&api, "Wrong shade", "Ordered light, got dark", None)
            .await
            .unwrap();
        assert_eq!(created.subject, "Wrong shade");
    }

    #[tokio::test]
    async fn test_reply_replaces_thread_with_server_list() {
        let api = fake(false);
        let mut thread = TicketThread::new(ticket(
            "open",
            serde_json::json!([{
                "message": "It arrived cracked",
                "sender": "customer",
                "createdAt": "2026-03-01T10:00:00Z"
            }]),
        ));

        let replies = thread.reply(&api, "  Thanks! ").await.unwrap();

        assert_eq!(replies.len(), 3);
        assert_eq!(replies[2].message, "Thanks!");
        assert_eq!(thread.ticket().status, TicketStatus::InProgress);
        assert!(!thread.is_sending());
    }

    #[tokio::test]
    async fn test_failed_reply_keeps_local_thread() {
        let api = fake(true);
        let mut thread = TicketThread::new(ticket("open", serde_json::json!([])));

        let err = thread.reply(&api, "Any update?").await.unwrap_err();

        assert!(matches!(err, SupportError::Request(_)));
        assert!(thread.replies().is_empty());
        assert_eq!(thread.error(), Some("Failed to send reply"));
    }

    #[tokio::test]
    async fn test_closed_ticket_rejects_reply() {
        let api = fake(false);
        let mut thread = TicketThread::new(ticket("closed", serde_json::json!([])));

        assert_eq!(thread.reply(&api, "Hello?").await.unwrap_err(), SupportError::Closed);
        assert_eq!(
            thread.reply(&api, " ").await.unwrap_err(),
            SupportError::Invalid({
                let mut errors = FieldErrors::new();
                errors.insert("message", "Message is required");
                errors
            })
        );
        assert!(api.sent.lock().unwrap().is_empty());
    }
}
