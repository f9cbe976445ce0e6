//! Address book handlers.
//!
//! Each request rebuilds an [`AddressBook`] from the backend list and the
//! selection kept in the session. Selection changes reported by the book
//! are written back to the session and into the checkout form.

use aurelle_core::{Address, AddressDraft, AddressId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::address::{AddressBook, AddressBookError};
use crate::error::Result;
use crate::guard::InFlightTicket;
use crate::middleware::RequireAuth;
use crate::models::VisitorSession;
use crate::notice::Notice;
use crate::state::AppState;

use super::Envelope;

/// In-flight action name for address mutations.
const ADDRESS_ACTION: &str = "address";

/// Address book page data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBookPage {
    pub addresses: Vec<Address>,
    pub selected_id: Option<AddressId>,
    pub primary_id: Option<AddressId>,
}

impl From<&AddressBook<'_>> for AddressBookPage {
    fn from(book: &AddressBook<'_>) -> Self {
        Self {
            addresses: book.list().to_vec(),
            selected_id: book.selected_id().cloned(),
            primary_id: book.primary().map(|a| a.id.clone()),
        }
    }
}

/// Result of one mutation plus the resulting book.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub book: AddressBookPage,
}

/// Record a selection change in the session and the checkout form.
///
/// `picked` is `None` when the book did not notify, `Some(None)` when the
/// selection was cleared.
async fn apply_selection(
    session: &VisitorSession,
    picked: Option<Option<Address>>,
) -> Result<()> {
    let Some(address) = picked else {
        return Ok(());
    };

    session
        .set_selected_address(address.as_ref().map(|a| &a.id))
        .await?;

    let mut wizard = session.checkout().await?;
    if wizard
        .edit(|form| form.select_address(address.as_ref()))
        .is_ok()
    {
        session.set_checkout(&wizard).await?;
    } else {
        debug!(step = %wizard.step(), "Checkout past details; shipping address unchanged");
    }
    Ok(())
}

/// Refuse a second address mutation while one is in flight.
async fn begin(state: &AppState, session: &VisitorSession) -> Result<InFlightTicket> {
    let visitor = session.visitor_id().await?;
    state
        .in_flight()
        .try_begin(&visitor, ADDRESS_ACTION)
        .ok_or_else(|| AddressBookError::Busy.into())
}

/// Address book with the primary address preselected.
///
/// # Errors
///
/// Returns an error if the backend call fails.
#[instrument(skip_all)]
pub async fn index(
    RequireAuth(api): RequireAuth,
    session: VisitorSession,
) -> Result<Json<Envelope<AddressBookPage>>> {
    let addresses = api.list_addresses().await?;
    let selected = session.selected_address().await?;

    let mut picked = None;
    let page = {
        let mut book = AddressBook::new(0, addresses)
            .with_selected(selected)
            .on_select(|a| picked = Some(a.cloned()));
        book.preselect_primary();
        AddressBookPage::from(&book)
    };
    apply_selection(&session, picked).await?;

    Ok(Envelope::ok(page))
}

/// Create an address; it becomes the selected one.
///
/// # Errors
///
/// Returns 422 with field errors before any backend call, 409 while
/// another address change is in flight, or the backend's error.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(api): RequireAuth,
    session: VisitorSession,
    Json(draft): Json<AddressDraft>,
) -> Result<(StatusCode, Json<Envelope<AddressChange>>)> {
    draft.validate().map_err(AddressBookError::Invalid)?;
    let _ticket = begin(&state, &session).await?;

    let addresses = api.list_addresses().await?;
    let selected = session.selected_address().await?;

    let mut picked = None;
    let change = {
        let mut book = AddressBook::new(0, addresses)
            .with_selected(selected)
            .on_select(|a| picked = Some(a.cloned()));
        let address = book.create(&api, &draft).await?;
        AddressChange {
            address: Some(address),
            book: AddressBookPage::from(&book),
        }
    };
    apply_selection(&session, picked).await?;

    Ok((
        StatusCode::CREATED,
        Envelope::with_notice(change, Notice::success("Address saved")),
    ))
}

/// Update an address.
///
/// # Errors
///
/// Returns 422 with field errors before any backend call, 409 while
/// another address change is in flight, or the backend's error.
#[instrument(skip_all, fields(address_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(api): RequireAuth,
    session: VisitorSession,
    Path(id): Path<AddressId>,
    Json(draft): Json<AddressDraft>,
) -> Result<Json<Envelope<AddressChange>>> {
    draft.validate().map_err(AddressBookError::Invalid)?;
    let _ticket = begin(&state, &session).await?;

    let addresses = api.list_addresses().await?;
    let selected = session.selected_address().await?;

    let mut picked = None;
    let change = {
        let mut book = AddressBook::new(0, addresses)
            .with_selected(selected)
            .on_select(|a| picked = Some(a.cloned()));
        let address = book.update(&api, &id, &draft).await?;
        AddressChange {
            address: Some(address),
            book: AddressBookPage::from(&book),
        }
    };
    apply_selection(&session, picked).await?;

    Ok(Envelope::with_notice(
        change,
        Notice::success("Address updated"),
    ))
}

/// Delete an address. Deleting the selected address clears the selection.
///
/// # Errors
///
/// Returns 409 while another address change is in flight, or the
/// backend's error.
#[instrument(skip_all, fields(address_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(api): RequireAuth,
    session: VisitorSession,
    Path(id): Path<AddressId>,
) -> Result<Json<Envelope<AddressChange>>> {
    let _ticket = begin(&state, &session).await?;

    let addresses = api.list_addresses().await?;
    let selected = session.selected_address().await?;

    let mut picked = None;
    let change = {
        let mut book = AddressBook::new(0, addresses)
            .with_selected(selected)
            .on_select(|a| picked = Some(a.cloned()));
        book.delete(&api, &id).await?;
        AddressChange {
            address: None,
            book: AddressBookPage::from(&book),
        }
    };
    apply_selection(&session, picked).await?;

    Ok(Envelope::with_notice(
        change,
        Notice::success("Address removed"),
    ))
}

/// Select an address for checkout.
///
/// # Errors
///
/// Returns 404 if the address is not in the visitor's book.
#[instrument(skip_all, fields(address_id = %id))]
pub async fn select(
    RequireAuth(api): RequireAuth,
    session: VisitorSession,
    Path(id): Path<AddressId>,
) -> Result<Json<Envelope<AddressBookPage>>> {
    let addresses = api.list_addresses().await?;

    let mut picked = None;
    let page = {
        let mut book = AddressBook::new(0, addresses).on_select(|a| picked = Some(a.cloned()));
        book.select(&id)?;
        AddressBookPage::from(&book)
    };
    apply_selection(&session, picked).await?;

    Ok(Envelope::ok(page))
}
