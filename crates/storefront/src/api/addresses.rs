//! Address book endpoints (`address`, `address/{id}`).

use aurelle_core::{Address, AddressDraft, AddressId};
use tracing::instrument;

use super::types::AddressList;
use super::{ApiClient, ApiError};

impl ApiClient {
    /// List the customer's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
        let list: AddressList = self.get(&["address"], &[]).await?;
        Ok(list.addresses)
    }

    /// Create an address. The draft should already be validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, draft))]
    pub async fn create_address(&self, draft: &AddressDraft) -> Result<Address, ApiError> {
        self.post(&["address"], draft).await
    }

    /// Replace an address with the draft's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, draft), fields(address_id = %id))]
    pub async fn update_address(
        &self,
        id: &AddressId,
        draft: &AddressDraft,
    ) -> Result<Address, ApiError> {
        self.put(&["address", id.as_str()], draft).await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: &AddressId) -> Result<(), ApiError> {
        let _: serde_json::Value = self.delete(&["address", id.as_str()]).await?;
        Ok(())
    }
}
