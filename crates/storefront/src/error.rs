//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Errors are returned as JSON in the same envelope the backend uses:
//! `{ "success": false, "message": "...", "code": "...", "errors": {...} }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::address::AddressBookError;
use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::notice::{Notice, RequestFailure};
use crate::orders::ReviewError;
use crate::profile::ProfileError;
use crate::support::SupportError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// A backend failure already turned into a user-facing notice.
    #[error("{}", .notice.message)]
    Upstream {
        status: StatusCode,
        notice: Notice,
        code: Option<String>,
    },

    /// Form input failed validation; nothing was sent to the backend.
    #[error("Validation failed: {message}")]
    Validation { message: String, errors: Value },

    /// The same action is already in flight for this visitor.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A validation failure with a field → message map.
    pub fn validation(message: impl Into<String>, errors: &impl serde::Serialize) -> Self {
        Self::Validation {
            message: message.into(),
            errors: serde_json::to_value(errors).unwrap_or(Value::Null),
        }
    }

    /// A failed backend call surfaced with its notice, keeping the status.
    #[must_use]
    pub fn upstream(err: &ApiError, notice: Notice) -> Self {
        Self::from(RequestFailure {
            notice,
            status: err.status(),
            code: err.code().map(String::from),
        })
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) => match err {
                ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                ApiError::Rejected { status, .. } => StatusCode::from_u16(*status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Upstream { status, .. } => *status,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let (message, code, errors) = match self {
            Self::Api(err) => {
                let code = err.code().map(String::from);
                let message = match &err {
                    ApiError::Unauthorized(_) => "Please sign in to continue".to_string(),
                    _ if status.is_server_error() => "External service error".to_string(),
                    _ => err
                        .server_message()
                        .map_or_else(|| "Request failed".to_string(), String::from),
                };
                (message, code, None)
            }
            Self::Upstream { notice, code, .. } => (notice.message, code, None),
            Self::Validation { message, errors } => {
                (message, Some("VALIDATION_ERROR".to_string()), Some(errors))
            }
            Self::Session(_) | Self::Internal(_) => {
                ("Internal server error".to_string(), None, None)
            }
            Self::Conflict(msg) => (msg, Some("IN_FLIGHT".to_string()), None),
            other => (other.to_string(), None, None),
        };

        let mut body = json!({ "success": false, "message": message });
        if let Some(code) = code {
            body["code"] = Value::String(code);
        }
        if let Some(errors) = errors {
            body["errors"] = errors;
        }

        (status, Json(body)).into_response()
    }
}

/// Backend 4xx statuses pass through; anything else is a bad gateway.
impl From<RequestFailure> for AppError {
    fn from(failure: RequestFailure) -> Self {
        let status = failure
            .status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .filter(StatusCode::is_client_error)
            .unwrap_or(StatusCode::BAD_GATEWAY);
        Self::Upstream {
            status,
            notice: failure.notice,
            code: failure.code,
        }
    }
}

impl From<AddressBookError> for AppError {
    fn from(err: AddressBookError) -> Self {
        match err {
            AddressBookError::Invalid(errors) => {
                Self::validation("Please fix the highlighted fields", &errors)
            }
            AddressBookError::Busy => {
                Self::Conflict("Another address change is in progress".to_string())
            }
            AddressBookError::NotFound(id) => Self::NotFound(format!("address {id}")),
            AddressBookError::Request(failure) => failure.into(),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::WrongStep { .. } => Self::BadRequest(err.to_string()),
            CheckoutError::InFlight => Self::Conflict(err.to_string()),
            CheckoutError::Failed(message) => Self::Upstream {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                notice: Notice::error(message),
                code: None,
            },
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Request(failure) => failure.into(),
            ReviewError::InvalidRating(_) => {
                Self::validation(err.to_string(), &json!({ "rating": err.to_string() }))
            }
            ReviewError::CommentTooLong(_) => {
                Self::validation(err.to_string(), &json!({ "comment": err.to_string() }))
            }
            ReviewError::NotOpen | ReviewError::NotDelivered => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<SupportError> for AppError {
    fn from(err: SupportError) -> Self {
        match err {
            SupportError::Invalid(errors) => {
                Self::validation("Please fix the highlighted fields", &errors)
            }
            SupportError::Closed => Self::BadRequest(err.to_string()),
            SupportError::Request(failure) => failure.into(),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Invalid(errors) => {
                Self::validation("Please fix the highlighted fields", &errors)
            }
            ProfileError::Request(failure) => failure.into(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Submitted order", Some(&[("payment_method", "cod")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
