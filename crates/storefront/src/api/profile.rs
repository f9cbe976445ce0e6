//! Profile endpoints.

use tracing::instrument;

use super::types::{Profile, ProfilePatch};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetch the signed-in customer's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the visitor is not signed in.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.get(&["profile"], &[]).await
    }

    /// Apply a partial update and return the updated profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<Profile, ApiError> {
        self.patch(&["profile"], patch).await
    }
}
