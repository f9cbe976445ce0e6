//! Toast notices shown after a request settles.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::ApiError;

/// Visual tone of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

/// A toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub tone: Tone,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            message: message.into(),
        }
    }

    /// Turn a failed request into a notice.
    ///
    /// Uses the backend's message when it sent one, otherwise `fallback`.
    /// The backend's error code, if any, picks the tone.
    #[must_use]
    pub fn from_api_error(err: &ApiError, fallback: &str) -> Self {
        warn!(error = %err, "Request failed");

        let message = match err {
            ApiError::RateLimited(secs) => {
                format!("Too many requests. Please try again in {secs} seconds.")
            }
            _ => err
                .server_message()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(fallback)
                .to_string(),
        };

        Self {
            tone: tone_for_code(err.code()),
            message,
        }
    }
}

/// A failed backend call: the notice to show plus what the backend answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub notice: Notice,
    pub status: Option<u16>,
    pub code: Option<String>,
}

impl RequestFailure {
    #[must_use]
    pub fn from_api_error(err: &ApiError, fallback: &str) -> Self {
        Self {
            notice: Notice::from_api_error(err, fallback),
            status: err.status(),
            code: err.code().map(String::from),
        }
    }
}

fn tone_for_code(code: Option<&str>) -> Tone {
    match code {
        Some("VALIDATION_ERROR" | "OUT_OF_STOCK" | "DUPLICATE" | "LIMIT_REACHED") => Tone::Warning,
        Some("INFO" | "NO_CHANGES") => Tone::Info,
        _ => Tone::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_server_message() {
        let err = ApiError::Rejected {
            status: 400,
            message: Some("Address limit reached".to_string()),
            code: Some("LIMIT_REACHED".to_string()),
        };
        let notice = Notice::from_api_error(&err, "Failed to save address");
        assert_eq!(notice.message, "Address limit reached");
        assert_eq!(notice.tone, Tone::Warning);
    }

    #[test]
    fn test_falls_back_without_message() {
        let err = ApiError::Rejected {
            status: 500,
            message: None,
            code: None,
        };
        let notice = Notice::from_api_error(&err, "Failed to save address");
        assert_eq!(notice.message, "Failed to save address");
        assert_eq!(notice.tone, Tone::Error);
    }

    #[test]
    fn test_blank_server_message_uses_fallback() {
        let err = ApiError::Unauthorized(Some("  ".to_string()));
        let notice = Notice::from_api_error(&err, "Please sign in");
        assert_eq!(notice.message, "Please sign in");
    }

    #[test]
    fn test_failure_keeps_status_and_code() {
        let err = ApiError::Rejected {
            status: 404,
            message: Some("Address not found".to_string()),
            code: Some("NOT_FOUND".to_string()),
        };
        let failure = RequestFailure::from_api_error(&err, "Failed to update address");
        assert_eq!(failure.notice.message, "Address not found");
        assert_eq!(failure.status, Some(404));
        assert_eq!(failure.code.as_deref(), Some("NOT_FOUND"));
    }

    #[test]
    fn test_rate_limited_message() {
        let notice = Notice::from_api_error(&ApiError::RateLimited(3), "ignored");
        assert!(notice.message.contains("3 seconds"));
    }
}
