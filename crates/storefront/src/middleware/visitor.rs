//! Visitor id middleware.
//!
//! Mints the visitor id before any API handler runs. The first response
//! that sets the session cookie then already carries it, and every later
//! request on that cookie shares one in-flight key.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::models::VisitorSession;

/// Middleware that makes sure the session has a visitor id.
pub async fn visitor_id_middleware(
    session: VisitorSession,
    request: Request,
    next: Next,
) -> Response {
    match session.visitor_id().await {
        Ok(_) => next.run(request).await,
        Err(e) => AppError::from(e).into_response(),
    }
}
