//! Address book with checkout selection.
//!
//! Holds the visitor's saved addresses and which one is selected for the
//! current checkout. Every mutation is one backend call; on success the
//! local list is patched in place and the selection listener is told about
//! selection changes. On failure the list is left untouched and the caller
//! gets a [`Notice`](crate::notice::Notice) to show.

use std::future::Future;

use aurelle_core::{Address, AddressDraft, AddressErrors, AddressId};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError};
use crate::notice::RequestFailure;
use crate::sync::Synced;

/// Backend operations used by [`AddressBook`].
pub trait AddressApi: Send + Sync {
    fn create_address(
        &self,
        draft: &AddressDraft,
    ) -> impl Future<Output = Result<Address, ApiError>> + Send;

    fn update_address(
        &self,
        id: &AddressId,
        draft: &AddressDraft,
    ) -> impl Future<Output = Result<Address, ApiError>> + Send;

    fn delete_address(&self, id: &AddressId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl AddressApi for ApiClient {
    fn create_address(
        &self,
        draft: &AddressDraft,
    ) -> impl Future<Output = Result<Address, ApiError>> + Send {
        Self::create_address(self, draft)
    }

    fn update_address(
        &self,
        id: &AddressId,
        draft: &AddressDraft,
    ) -> impl Future<Output = Result<Address, ApiError>> + Send {
        Self::update_address(self, id, draft)
    }

    fn delete_address(&self, id: &AddressId) -> impl Future<Output = Result<(), ApiError>> + Send {
        Self::delete_address(self, id)
    }
}

/// Why an address book operation did not go through.
#[derive(Debug, Error)]
pub enum AddressBookError {
    /// The draft failed validation; nothing was sent.
    #[error("Invalid address: {0}")]
    Invalid(AddressErrors),

    /// Another address mutation is still waiting on the backend.
    #[error("Another address change is in progress")]
    Busy,

    /// The address is not in the book.
    #[error("Address not found: {0}")]
    NotFound(AddressId),

    /// The backend call failed.
    #[error("{}", .0.notice.message)]
    Request(RequestFailure),
}

type SelectionListener<'a> = Box<dyn FnMut(Option<&Address>) + Send + 'a>;

/// The visitor's saved addresses plus the checkout selection.
pub struct AddressBook<'a> {
    addresses: Synced<Vec<Address>>,
    selected: Option<AddressId>,
    submitting: bool,
    listener: Option<SelectionListener<'a>>,
}

impl<'a> AddressBook<'a> {
    #[must_use]
    pub fn new(version: u64, addresses: Vec<Address>) -> Self {
        Self {
            addresses: Synced::new(version, addresses),
            selected: None,
            submitting: false,
            listener: None,
        }
    }

    /// Register the callback told about selection changes.
    #[must_use]
    pub fn on_select(mut self, listener: impl FnMut(Option<&Address>) + Send + 'a) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Restore a selection without notifying. Ignored if the id is unknown.
    #[must_use]
    pub fn with_selected(mut self, id: Option<AddressId>) -> Self {
        let selected = id.filter(|id| self.find(id).is_some());
        self.selected = selected;
        self
    }

    /// Saved addresses in backend order.
    #[must_use]
    pub fn list(&self) -> &[Address] {
        self.addresses.value()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Address> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }

    #[must_use]
    pub const fn selected_id(&self) -> Option<&AddressId> {
        self.selected.as_ref()
    }

    /// Whether a mutation is waiting on the backend; the submit control is
    /// disabled while this is `true`.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The address flagged primary by the backend.
    #[must_use]
    pub fn primary(&self) -> Option<&Address> {
        self.list().iter().find(|a| a.is_primary)
    }

    /// Replace the list when upstream data changes. A selection that no
    /// longer exists is cleared.
    pub fn reconcile(&mut self, version: u64, addresses: Vec<Address>) -> bool {
        if !self.addresses.reconcile(version, addresses) {
            return false;
        }
        if let Some(id) = &self.selected
            && self.find(id).is_none()
        {
            self.selected = None;
            self.notify(None);
        }
        true
    }

    /// Select an existing address for checkout.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is not in the book.
    pub fn select(&mut self, id: &AddressId) -> Result<&Address, AddressBookError> {
        if self.find(id).is_none() {
            return Err(AddressBookError::NotFound(id.clone()));
        }
        self.selected = Some(id.clone());
        self.notify_selected();
        self.find(id)
            .ok_or_else(|| AddressBookError::NotFound(id.clone()))
    }

    /// Select the primary address if nothing is selected yet.
    pub fn preselect_primary(&mut self) -> Option<&Address> {
        if self.selected.is_none() {
            let primary = self.primary().map(|a| a.id.clone());
            if let Some(id) = primary {
                self.selected = Some(id);
                self.notify_selected();
            }
        }
        self.selected()
    }

    /// Validate and create an address. The new address becomes selected.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` before any request if the draft fails validation,
    /// or `Request` if the backend call fails.
    #[instrument(skip_all)]
    pub async fn create<A: AddressApi>(
        &mut self,
        api: &A,
        draft: &AddressDraft,
    ) -> Result<Address, AddressBookError> {
        draft.validate().map_err(AddressBookError::Invalid)?;
        self.begin()?;

        let result = api.create_address(&draft.normalized()).await;
        self.submitting = false;

        let address = result.map_err(|e| {
            let failure = RequestFailure::from_api_error(&e, "Failed to save address");
            AddressBookError::Request(failure)
        })?;

        debug!(address_id = %address.id, "Address created");
        self.addresses.value_mut().push(address.clone());
        self.selected = Some(address.id.clone());
        self.notify(Some(&address));
        Ok(address)
    }

    /// Validate and update an address. If it is selected the listener
    /// receives the new data.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` before any request if the draft fails validation,
    /// or `Request` if the backend call fails.
    #[instrument(skip_all, fields(address_id = %id))]
    pub async fn update<A: AddressApi>(
        &mut self,
        api: &A,
        id: &AddressId,
        draft: &AddressDraft,
    ) -> Result<Address, AddressBookError> {
        draft.validate().map_err(AddressBookError::Invalid)?;
        self.begin()?;

        let result = api.update_address(id, &draft.normalized()).await;
        self.submitting = false;

        let address = result.map_err(|e| {
            let failure = RequestFailure::from_api_error(&e, "Failed to update address");
            AddressBookError::Request(failure)
        })?;

        for existing in self.addresses.value_mut().iter_mut() {
            if existing.id == *id {
                *existing = address.clone();
            }
        }
        if self.selected.as_ref() == Some(id) {
            self.notify(Some(&address));
        }
        Ok(address)
    }

    /// Delete an address. Deleting the selected address clears the
    /// selection and the listener receives `None`.
    ///
    /// # Errors
    ///
    /// Returns `Request` if the backend call fails.
    #[instrument(skip_all, fields(address_id = %id))]
    pub async fn delete<A: AddressApi>(
        &mut self,
        api: &A,
        id: &AddressId,
    ) -> Result<(), AddressBookError> {
        self.begin()?;

        let result = api.delete_address(id).await;
        self.submitting = false;

        result.map_err(|e| {
            let failure = RequestFailure::from_api_error(&e, "Failed to delete address");
            AddressBookError::Request(failure)
        })?;

        self.addresses.value_mut().retain(|a| a.id != *id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
            self.notify(None);
        }
        Ok(())
    }

    fn begin(&mut self) -> Result<(), AddressBookError> {
        if self.submitting {
            return Err(AddressBookError::Busy);
        }
        self.submitting = true;
        Ok(())
    }

    fn find(&self, id: &AddressId) -> Option<&Address> {
        self.list().iter().find(|a| a.id == *id)
    }

    fn notify_selected(&mut self) {
        let selected = self.selected().cloned();
        self.notify(selected.as_ref());
    }

    fn notify(&mut self, address: Option<&Address>) {
        if let Some(listener) = self.listener.as_mut() {
            listener(address);
        }
    }
}
