//! Profile editing with changed-fields-only updates.

use std::future::Future;

use aurelle_core::Email;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError, Profile, ProfilePatch};
use crate::form::FieldErrors;
use crate::notice::RequestFailure;

/// Backend operation used by [`save_profile`].
pub trait ProfileApi: Send + Sync {
    fn update_profile(
        &self,
        patch: &ProfilePatch,
    ) -> impl Future<Output = Result<Profile, ApiError>> + Send;
}

impl ProfileApi for ApiClient {
    fn update_profile(
        &self,
        patch: &ProfilePatch,
    ) -> impl Future<Output = Result<Profile, ApiError>> + Send {
        Self::update_profile(self, patch)
    }
}

/// Profile errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Invalid profile: {0}")]
    Invalid(FieldErrors),

    #[error("{}", .0.notice.message)]
    Request(RequestFailure),
}

/// The profile form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ProfileForm {
    /// Build a patch holding only the fields that differ from `current`.
    ///
    /// # Errors
    ///
    /// Returns field errors for a blank name or a malformed email.
    pub fn diff(&self, current: &Profile) -> Result<ProfilePatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut patch = ProfilePatch::default();

        if let Some(name) = &self.name {
            let name = name.trim();
            if name.is_empty() {
                errors.insert("name", "Name is required");
            } else if name != current.name {
                patch.name = Some(name.to_string());
            }
        }

        if let Some(email) = &self.email {
            match Email::parse(email) {
                Ok(email) if !email.as_str().eq_ignore_ascii_case(&current.email) => {
                    patch.email = Some(email.into_inner());
                }
                Ok(_) => {}
                Err(e) => errors.insert("email", e.to_string()),
            }
        }

        if let Some(phone) = &self.phone {
            let phone = phone.trim();
            if phone != current.phone.as_deref().unwrap_or_default() {
                patch.phone = Some(phone.to_string());
            }
        }

        errors.into_result(patch)
    }
}

/// Save the profile form. Returns `None` without calling the backend when
/// nothing changed.
///
/// # Errors
///
/// Returns `Invalid` before any request, or `Request` if the backend call
/// fails.
#[instrument(skip_all)]
pub async fn save_profile<A: ProfileApi>(
    api: &A,
    current: &Profile,
    form: &ProfileForm,
) -> Result<Option<Profile>, ProfileError> {
    let patch = form.diff(current).map_err(ProfileError::Invalid)?;
    if patch.is_empty() {
        debug!("Profile unchanged; nothing sent");
        return Ok(None);
    }
    api.update_profile(&patch)
        .await
        .map(Some)
        .map_err(|e| {
            ProfileError::Request(RequestFailure::from_api_error(&e, "Failed to update profile"))
        })
}
