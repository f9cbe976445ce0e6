//! `ApiClient` and the address book against the fake backend.

use std::sync::{Arc, Mutex};

use aurelle_core::{AddressDraft, AddressId};
use aurelle_integration_tests::{FakeBackend, TEST_TOKEN};
use aurelle_storefront::address::{AddressBook, AddressBookError};
use aurelle_storefront::api::ApiError;
use aurelle_storefront::support::{SupportError, TicketThread, open_ticket};

fn draft(title: &str, postal_code: &str) -> AddressDraft {
    AddressDraft {
        title: title.to_string(),
        address_line1: "4 Residency Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        postal_code: postal_code.to_string(),
        ..AddressDraft::default()
    }
}

#[tokio::test]
async fn test_success_false_with_ok_status_is_an_error() {
    let backend = FakeBackend::spawn().await;
    backend.data().cart_down = true;
    let api = backend.api_client(Some(TEST_TOKEN));

    let err = api.get_cart().await.expect_err("success: false must fail");
    match err {
        ApiError::Rejected {
            status,
            message,
            code,
        } => {
            assert_eq!(status, 200);
            assert_eq!(message.as_deref(), Some("Cart service unavailable"));
            assert_eq!(code.as_deref(), Some("UPSTREAM"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let backend = FakeBackend::spawn().await;
    let api = backend.api_client(None);

    let err = api.list_addresses().await.expect_err("Token required");
    assert!(matches!(err, ApiError::Unauthorized(Some(ref m)) if m == "Please log in again"));
}

#[tokio::test]
async fn test_address_book_lifecycle_notifies_selection() {
    let backend = FakeBackend::spawn().await;
    let api = backend.api_client(Some(TEST_TOKEN));
    let seen: Arc<Mutex<Vec<Option<AddressId>>>> = Arc::default();

    let addresses = api.list_addresses().await.expect("List addresses");
    let sink = seen.clone();
    let mut book = AddressBook::new(0, addresses).on_select(move |a| {
        sink.lock().expect("lock").push(a.map(|a| a.id.clone()));
    });

    assert_eq!(book.preselect_primary().map(|a| a.title.as_str()), Some("Home"));

    let office = book
        .create(&api, &draft("  Office ", "560025"))
        .await
        .expect("Create address");
    assert_eq!(office.title, "Office", "Draft is trimmed before sending");
    assert_eq!(book.selected_id(), Some(&office.id));

    let renamed = book
        .update(&api, &office.id, &draft("Studio", "560025"))
        .await
        .expect("Update address");
    assert_eq!(renamed.title, "Studio");

    book.delete(&api, &office.id).await.expect("Delete address");
    assert_eq!(book.selected_id(), None);
    assert_eq!(book.list().len(), 1);
    assert_eq!(backend.data().addresses.len(), 1);

    let seen = seen.lock().expect("lock").clone();
    assert_eq!(
        seen,
        vec![
            Some(AddressId::new("addr-home")),
            Some(office.id.clone()),
            Some(office.id.clone()),
            None,
        ]
    );
}

#[tokio::test]
async fn test_invalid_address_is_never_sent() {
    let backend = FakeBackend::spawn().await;
    let api = backend.api_client(Some(TEST_TOKEN));
    let mut book = AddressBook::new(0, api.list_addresses().await.expect("List addresses"));

    let err = book
        .create(&api, &draft("Office", "056002"))
        .await
        .expect_err("Postal code starting with 0 is invalid");
    assert!(matches!(err, AddressBookError::Invalid(ref errors) if errors.len() == 1));
    assert_eq!(backend.data().addresses.len(), 1);
}

#[tokio::test]
async fn test_backend_rejection_keeps_the_book() {
    let backend = FakeBackend::spawn().await;
    let api = backend.api_client(Some(TEST_TOKEN));
    let mut book = AddressBook::new(0, api.list_addresses().await.expect("List addresses"));

    let err = book
        .delete(&api, &AddressId::new("addr-missing"))
        .await
        .expect_err("Unknown address");
    match err {
        AddressBookError::Request(failure) => {
            assert_eq!(failure.notice.message, "Address not found");
            assert_eq!(failure.status, Some(404));
            assert_eq!(failure.code.as_deref(), Some("NOT_FOUND"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(book.list().len(), 1);
    assert!(!book.is_submitting());
}

#[tokio::test]
async fn test_support_ticket_thread() {
    let backend = FakeBackend::spawn().await;
    let api = backend.api_client(Some(TEST_TOKEN));

    let err = open_ticket(&api, "  ", "Where is my order?", None)
        .await
        .expect_err("Blank subject");
    assert!(matches!(err, SupportError::Invalid(_)));
    assert!(backend.data().tickets.is_empty());

    let ticket = open_ticket(&api, "Late delivery", "Where is my order?", None)
        .await
        .expect("Open ticket");
    let mut thread = TicketThread::new(ticket);
    let replies = thread
        .reply(&api, "It has been a week.")
        .await
        .expect("Reply")
        .len();
    assert_eq!(replies, 2);
    assert_eq!(thread.replies()[1].message, "It has been a week.");
}
