//! Profile handlers.

use axum::Json;
use tracing::instrument;

use crate::api::Profile;
use crate::error::{Result, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::notice::{Notice, Tone};
use crate::profile::{ProfileForm, save_profile};

use super::Envelope;

/// The signed-in customer's profile.
///
/// # Errors
///
/// Returns an error if the backend call fails.
#[instrument(skip_all)]
pub async fn show(RequireAuth(api): RequireAuth) -> Result<Json<Envelope<Profile>>> {
    let profile = api.get_profile().await?;
    set_sentry_user(&profile.id, Some(&profile.email));
    Ok(Envelope::ok(profile))
}

/// Save changed profile fields. Nothing is sent when nothing changed.
///
/// # Errors
///
/// Returns 422 for a blank name or malformed email, or the backend's error.
#[instrument(skip_all)]
pub async fn update(
    RequireAuth(api): RequireAuth,
    Json(form): Json<ProfileForm>,
) -> Result<Json<Envelope<Profile>>> {
    let current = api.get_profile().await?;

    match save_profile(&api, &current, &form).await? {
        Some(updated) => Ok(Envelope::with_notice(
            updated,
            Notice::success("Profile updated"),
        )),
        None => Ok(Envelope::with_notice(
            current,
            Notice {
                tone: Tone::Info,
                message: "No changes to save".to_string(),
            },
        )),
    }
}
