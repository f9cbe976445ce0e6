//! Session-stored visitor state.
//!
//! Only UI state lives here: the visitor id used to key in-flight actions,
//! the checkout wizard and the address picked for checkout.

use aurelle_core::AddressId;
use tower_sessions::Session;
use tower_sessions::session::Error;
use uuid::Uuid;

use crate::checkout::CheckoutWizard;

/// Session keys.
pub mod keys {
    /// Random id minted on first use; keys the in-flight registry.
    pub const VISITOR_ID: &str = "visitor_id";

    /// Serialized [`crate::checkout::CheckoutWizard`].
    pub const CHECKOUT: &str = "checkout";

    /// Address selected for checkout.
    pub const SELECTED_ADDRESS: &str = "selected_address";
}

/// Typed access to the visitor's session.
#[derive(Debug, Clone)]
pub struct VisitorSession(Session);

impl VisitorSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// The visitor id, minting one on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn visitor_id(&self) -> Result<String, Error> {
        if let Some(id) = self.0.get::<String>(keys::VISITOR_ID).await? {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        self.0.insert(keys::VISITOR_ID, &id).await?;
        Ok(id)
    }

    /// The checkout wizard, fresh if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn checkout(&self) -> Result<CheckoutWizard, Error> {
        Ok(self
            .0
            .get::<CheckoutWizard>(keys::CHECKOUT)
            .await?
            .unwrap_or_default())
    }

    /// Store the checkout wizard. Mints the visitor id too when called
    /// outside the API middleware.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_checkout(&self, wizard: &CheckoutWizard) -> Result<(), Error> {
        self.visitor_id().await?;
        self.0.insert(keys::CHECKOUT, wizard).await
    }

    /// The address selected for checkout, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn selected_address(&self) -> Result<Option<AddressId>, Error> {
        self.0.get(keys::SELECTED_ADDRESS).await
    }

    /// Store or clear the selected address.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_selected_address(&self, id: Option<&AddressId>) -> Result<(), Error> {
        match id {
            Some(id) => self.0.insert(keys::SELECTED_ADDRESS, id).await,
            None => self
                .0
                .remove::<AddressId>(keys::SELECTED_ADDRESS)
                .await
                .map(|_| ()),
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for VisitorSession
where
    S: Send + Sync,
{
    type Rejection = <Session as axum::extract::FromRequestParts<S>>::Rejection;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::checkout::CheckoutStep;

    fn session() -> VisitorSession {
        VisitorSession::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_visitor_id_is_stable() {
        let session = session();
        let first = session.visitor_id().await.unwrap();
        assert_eq!(session.visitor_id().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_checkout_round_trip() {
        let session = session();
        let mut wizard = session.checkout().await.unwrap();
        assert_eq!(wizard.step(), CheckoutStep::Details);

        wizard.next_step();
        session.set_checkout(&wizard).await.unwrap();
        let visitor = session.0.get::<String>(keys::VISITOR_ID).await.unwrap();
        assert!(visitor.is_some());
        let restored = session.checkout().await.unwrap();
        assert_eq!(restored.step(), CheckoutStep::Review);
        assert_eq!(restored.idempotency_key(), wizard.idempotency_key());
    }

    #[tokio::test]
    async fn test_selected_address_set_and_clear() {
        let session = session();
        let id = AddressId::new("a-1");
        session.set_selected_address(Some(&id)).await.unwrap();
        assert_eq!(session.selected_address().await.unwrap(), Some(id));
        session.set_selected_address(None).await.unwrap();
        assert_eq!(session.selected_address().await.unwrap(), None);
    }
}
