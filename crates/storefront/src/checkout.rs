//! Two-step checkout wizard.
//!
//! ```text
//! Details --next--> Review --submit--> Submitted
//!    ^                |
//!    +------back------+
//! ```
//!
//! The wizard owns one [`CheckoutFormData`] and no server state. Moving to
//! `Review` does not validate anything; required fields are reported by the
//! form layer through [`CheckoutFormData::missing_required_fields`].
//!
//! Entering `Review` mints an idempotency key that every submission from
//! that step reuses, so a repeated submit of the same review collapses into
//! one order on the backend. Going back to `Details` discards the key.
//! While a submission is in flight a second one is refused.

use std::fmt;
use std::future::Future;

use aurelle_core::{Address, AddressId, OrderId, PaymentMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::{
    AddressSnapshot, ApiClient, CartItem, ContactDetails, CreateOrderRequest, PlacedOrder,
};
use crate::cart::items_total;
use crate::notice::Notice;

// =============================================================================
// Form data
// =============================================================================

/// Everything the customer enters during checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFormData {
    #[serde(default)]
    pub contact: ContactDetails,
    #[serde(default)]
    pub selected_address_id: Option<AddressId>,
    #[serde(default)]
    pub shipping_address: Option<AddressSnapshot>,
    #[serde(default)]
    pub same_as_shipping: bool,
    #[serde(default)]
    pub billing_address: AddressSnapshot,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: String,
}

impl Default for CheckoutFormData {
    fn default() -> Self {
        Self {
            contact: ContactDetails::default(),
            selected_address_id: None,
            shipping_address: None,
            same_as_shipping: true,
            billing_address: AddressSnapshot::default(),
            payment_method: PaymentMethod::default(),
            notes: String::new(),
        }
    }
}

impl CheckoutFormData {
    /// Use `address` for shipping, or clear the shipping address.
    pub fn select_address(&mut self, address: Option<&Address>) {
        self.selected_address_id = address.map(|a| a.id.clone());
        self.shipping_address = address.map(AddressSnapshot::from);
    }

    /// Fields the form marks `required` that are still empty.
    ///
    /// Billing fields are only required when billing differs from shipping.
    #[must_use]
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        let contact = [
            ("fullName", &self.contact.full_name),
            ("email", &self.contact.email),
            ("phone", &self.contact.phone),
        ];
        missing.extend(
            contact
                .into_iter()
                .filter(|(_, value)| value.trim().is_empty())
                .map(|(field, _)| field),
        );

        if self.shipping_address.is_none() {
            missing.push("shippingAddress");
        }

        if !self.same_as_shipping {
            let billing = [
                ("billingAddress.addressLine1", &self.billing_address.address_line1),
                ("billingAddress.city", &self.billing_address.city),
                ("billingAddress.state", &self.billing_address.state),
                ("billingAddress.postalCode", &self.billing_address.postal_code),
            ];
            missing.extend(
                billing
                    .into_iter()
                    .filter(|(_, value)| value.trim().is_empty())
                    .map(|(field, _)| field),
            );
        }

        missing
    }

    /// The billing address that will be sent.
    #[must_use]
    pub fn effective_billing(&self) -> Option<&AddressSnapshot> {
        if self.same_as_shipping {
            self.shipping_address.as_ref()
        } else {
            Some(&self.billing_address)
        }
    }

    /// Build the order creation payload from the current form.
    #[must_use]
    pub fn to_request(&self) -> CreateOrderRequest {
        let shipping = self.shipping_address.clone().unwrap_or_default();
        let billing = self.effective_billing().cloned().unwrap_or_default();
        let notes = self.notes.trim();

        CreateOrderRequest {
            address_id: self.selected_address_id.clone(),
            contact: ContactDetails {
                full_name: self.contact.full_name.trim().to_string(),
                email: self.contact.email.trim().to_string(),
                phone: self.contact.phone.trim().to_string(),
            },
            shipping_address: shipping,
            billing_address: billing,
            same_as_shipping: self.same_as_shipping,
            payment_method: self.payment_method,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        }
    }
}

/// Partial update of the form; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub same_as_shipping: Option<bool>,
    pub billing_address: Option<AddressSnapshot>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

impl CheckoutPatch {
    pub fn apply(self, form: &mut CheckoutFormData) {
        if let Some(full_name) = self.full_name {
            form.contact.full_name = full_name;
        }
        if let Some(email) = self.email {
            form.contact.email = email;
        }
        if let Some(phone) = self.phone {
            form.contact.phone = phone;
        }
        if let Some(same) = self.same_as_shipping {
            form.same_as_shipping = same;
        }
        if let Some(billing) = self.billing_address {
            form.billing_address = billing;
        }
        if let Some(method) = self.payment_method {
            form.payment_method = method;
        }
        if let Some(notes) = self.notes {
            form.notes = notes;
        }
    }
}

// =============================================================================
// Review summary
// =============================================================================

/// Read-only summary shown on the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub contact: ContactDetails,
    pub shipping_address: Option<AddressSnapshot>,
    pub billing_address: Option<AddressSnapshot>,
    pub same_as_shipping: bool,
    pub payment_method: PaymentMethod,
    pub payment_label: &'static str,
    pub notes: Option<String>,
    pub items: Vec<CartItem>,
    pub item_count: u32,
    /// Sum of the backend's line totals, for display only.
    pub items_total: Decimal,
}

impl ReviewSummary {
    #[must_use]
    pub fn build(form: &CheckoutFormData, items: &[CartItem]) -> Self {
        let notes = form.notes.trim();
        Self {
            contact: form.contact.clone(),
            shipping_address: form.shipping_address.clone(),
            billing_address: form.effective_billing().cloned(),
            same_as_shipping: form.same_as_shipping,
            payment_method: form.payment_method,
            payment_label: form.payment_method.label(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            items: items.to_vec(),
            item_count: items.iter().map(|i| i.quantity).sum(),
            items_total: items_total(items),
        }
    }
}

// =============================================================================
// Wizard
// =============================================================================

/// Wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Details,
    Review,
    Submitted,
}

impl CheckoutStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Details => "details",
            Self::Review => "review",
            Self::Submitted => "submitted",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkout errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Checkout is on the {actual} step, expected {expected}")]
    WrongStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    #[error("Your order is already being placed")]
    InFlight,

    /// The submitter reported a failure; the message is shown inline.
    #[error("{0}")]
    Failed(String),
}

/// Where the visitor goes after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CheckoutOutcome {
    /// Cash on delivery: show the order confirmation.
    Confirmed { order_id: OrderId, redirect: String },
    /// Online payment: hand off to the payment gateway.
    PaymentRequired {
        order_id: OrderId,
        razorpay_order_id: String,
        /// Amount in paise.
        amount: u64,
        currency: String,
    },
}

impl CheckoutOutcome {
    fn from_placed(order: PlacedOrder, method: PaymentMethod) -> Self {
        match (method, order.razorpay_order) {
            (PaymentMethod::Online, Some(razorpay)) => Self::PaymentRequired {
                order_id: order.order_id,
                razorpay_order_id: razorpay.id,
                amount: razorpay.amount,
                currency: razorpay.currency,
            },
            (method, _) => {
                if method == PaymentMethod::Online {
                    warn!(
                        order_id = %order.order_id,
                        "Online order placed without a gateway order"
                    );
                }
                Self::Confirmed {
                    redirect: confirmation_path(&order.order_id),
                    order_id: order.order_id,
                }
            }
        }
    }

    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Confirmed { order_id, .. } | Self::PaymentRequired { order_id, .. } => order_id,
        }
    }
}

/// Storefront path of an order's confirmation page.
#[must_use]
pub fn confirmation_path(order_id: &OrderId) -> String {
    format!("/orders/{order_id}?placed=1")
}

/// Creates the order for a submitted form.
pub trait OrderSubmitter: Send + Sync {
    /// Place the order; an error is the message to show the customer.
    fn submit_order(
        &self,
        form: &CheckoutFormData,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<PlacedOrder, String>> + Send;
}

impl OrderSubmitter for ApiClient {
    fn submit_order(
        &self,
        form: &CheckoutFormData,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<PlacedOrder, String>> + Send {
        let request = form.to_request();
        let key = idempotency_key.to_string();
        async move {
            self.place_order(&request, &key)
                .await
                .map_err(|e| Notice::from_api_error(&e, "Failed to place order").message)
        }
    }
}

/// A submission handed to the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Snapshot of the form at submit time.
    pub form: CheckoutFormData,
    pub idempotency_key: String,
}

/// The checkout wizard state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutWizard {
    step: CheckoutStep,
    form: CheckoutFormData,
    idempotency_key: Option<String>,
    submitting: bool,
    error: Option<String>,
    outcome: Option<CheckoutOutcome>,
}

impl CheckoutWizard {
    #[must_use]
    pub fn new(form: CheckoutFormData) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutFormData {
        &self.form
    }

    /// The inline error from the last failed submission.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    /// The result of the last successful submission.
    #[must_use]
    pub const fn outcome(&self) -> Option<&CheckoutOutcome> {
        self.outcome.as_ref()
    }

    /// Edit the form. Only allowed on the details step.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` outside `Details`.
    pub fn edit(&mut self, f: impl FnOnce(&mut CheckoutFormData)) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Details)?;
        f(&mut self.form);
        Ok(())
    }

    /// Advance from `Details` to `Review`.
    ///
    /// No field is checked here. Mints the idempotency key for the review.
    pub fn next_step(&mut self) -> CheckoutStep {
        if self.step == CheckoutStep::Details {
            self.step = CheckoutStep::Review;
            self.error = None;
            self.idempotency_key
                .get_or_insert_with(|| Uuid::new_v4().to_string());
        }
        self.step
    }

    /// Go back from `Review` to `Details`, discarding the idempotency key.
    pub fn prev_step(&mut self) -> CheckoutStep {
        if self.step == CheckoutStep::Review && !self.submitting {
            self.step = CheckoutStep::Details;
            self.idempotency_key = None;
            self.error = None;
        }
        self.step
    }

    /// Start over after a completed checkout.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// Summary for the review step.
    #[must_use]
    pub fn review(&self, items: &[CartItem]) -> ReviewSummary {
        ReviewSummary::build(&self.form, items)
    }

    /// Mark a submission as in flight and snapshot the form.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` outside `Review` and `InFlight` if a submission
    /// has not finished yet.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, CheckoutError> {
        self.expect_step(CheckoutStep::Review)?;
        if self.submitting {
            return Err(CheckoutError::InFlight);
        }

        let key = self
            .idempotency_key
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        self.submitting = true;
        self.error = None;

        Ok(PendingSubmission {
            form: self.form.clone(),
            idempotency_key: key,
        })
    }

    /// Settle the in-flight submission.
    ///
    /// On success the form is discarded and the wizard is `Submitted`. On
    /// failure the message is kept in [`CheckoutWizard::error`] and the
    /// review step stays, with the same idempotency key.
    ///
    /// # Errors
    ///
    /// Returns `Failed` with the submitter's message.
    pub fn finish_submit(
        &mut self,
        result: Result<PlacedOrder, String>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        self.submitting = false;

        match result {
            Ok(placed) => {
                let outcome = CheckoutOutcome::from_placed(placed, self.form.payment_method);
                info!(order_id = %outcome.order_id(), "Order placed");
                self.step = CheckoutStep::Submitted;
                self.form = CheckoutFormData::default();
                self.idempotency_key = None;
                self.error = None;
                self.outcome = Some(outcome.clone());
                Ok(outcome)
            }
            Err(message) => {
                warn!(error = %message, "Order submission failed");
                self.error = Some(message.clone());
                Err(CheckoutError::Failed(message))
            }
        }
    }

    /// Submit the current form through `submitter`.
    ///
    /// # Errors
    ///
    /// See [`CheckoutWizard::begin_submit`] and
    /// [`CheckoutWizard::finish_submit`].
    #[instrument(skip_all, fields(payment_method = %self.form.payment_method))]
    pub async fn submit<S: OrderSubmitter>(
        &mut self,
        submitter: &S,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let pending = self.begin_submit()?;
        let result = submitter
            .submit_order(&pending.form, &pending.idempotency_key)
            .await;
        self.finish_submit(result)
    }

    fn expect_step(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use crate::api::RazorpayOrder;

    use super::*;

    struct RecordingSubmitter {
        result: Result<PlacedOrder, String>,
        seen: Mutex<Vec<(CheckoutFormData, String)>>,
    }

    impl RecordingSubmitter {
        fn ok(razorpay: Option<RazorpayOrder>) -> Self {
            Self {
                result: Ok(PlacedOrder {
                    order_id: OrderId::new("o-1"),
                    order_number: Some("AUR-1001".to_string()),
                    razorpay_order: razorpay,
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl OrderSubmitter for RecordingSubmitter {
        fn submit_order(
            &self,
            form: &CheckoutFormData,
            idempotency_key: &str,
        ) -> impl Future<Output = Result<PlacedOrder, String>> + Send {
            self.seen
                .lock()
                .unwrap()
                .push((form.clone(), idempotency_key.to_string()));
            let result = self.result.clone();
            async move { result }
        }
    }

    fn home() -> Address {
        serde_json::from_value(serde_json::json!({
            "_id": "a1", "title": "Home", "addressLine1": "12 Carter Road",
            "city": "Mumbai", "state": "Maharashtra", "postalCode": "400050"
        }))
        .unwrap()
    }

    fn filled_form(method: PaymentMethod) -> CheckoutFormData {
        let mut form = CheckoutFormData {
            contact: ContactDetails {
                full_name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
            },
            payment_method: method,
            ..CheckoutFormData::default()
        };
        form.select_address(Some(&home()));
        form
    }

    fn item(total: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id: aurelle_core::ProductId::new("p1"),
            name: "Rose Toner".to_string(),
            quantity,
            selected_variant: None,
            item_total: total.parse().unwrap(),
            image: None,
        }
    }

    #[test]
    fn test_next_step_never_validates() {
        let mut wizard = CheckoutWizard::default();
        assert!(!wizard.form().missing_required_fields().is_empty());

        assert_eq!(wizard.next_step(), CheckoutStep::Review);
        assert!(wizard.idempotency_key().is_some());
    }

    #[test]
    fn test_key_is_reused_until_back() {
        let mut wizard = CheckoutWizard::new(filled_form(PaymentMethod::Cod));
        wizard.next_step();
        let first = wizard.idempotency_key().unwrap().to_string();

        wizard.next_step();
        assert_eq!(wizard.idempotency_key(), Some(first.as_str()));

        assert_eq!(wizard.prev_step(), CheckoutStep::Details);
        assert!(wizard.idempotency_key().is_none());

        wizard.next_step();
        assert_ne!(wizard.idempotency_key(), Some(first.as_str()));
    }

    #[test]
    fn test_edit_only_on_details() {
        let mut wizard = CheckoutWizard::default();
        wizard
            .edit(|form| form.notes = "Leave at the gate".to_string())
            .unwrap();
        wizard.next_step();

        let err = wizard.edit(|form| form.notes.clear()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::WrongStep {
                expected: CheckoutStep::Details,
                actual: CheckoutStep::Review
            }
        );
        assert_eq!(wizard.form().notes, "Leave at the gate");
    }

    #[test]
    fn test_missing_fields_respect_same_as_shipping() {
        let mut form = filled_form(PaymentMethod::Cod);
        assert!(form.missing_required_fields().is_empty());

        form.same_as_shipping = false;
        let missing = form.missing_required_fields();
        assert_eq!(missing.len(), 4);
        assert!(missing.contains(&"billingAddress.postalCode"));

        form.select_address(None);
        assert!(form.missing_required_fields().contains(&"shippingAddress"));
    }

    #[tokio::test]
    async fn test_cod_submit_hands_snapshot_to_submitter() {
        let form = filled_form(PaymentMethod::Cod);
        let mut wizard = CheckoutWizard::new(form.clone());
        wizard.next_step();
        let key = wizard.idempotency_key().unwrap().to_string();
        let submitter = RecordingSubmitter::ok(None);

        let outcome = wizard.submit(&submitter).await.unwrap();

        let seen = submitter.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, form);
        assert_eq!(seen[0].1, key);
        assert_eq!(
            outcome,
            CheckoutOutcome::Confirmed {
                order_id: OrderId::new("o-1"),
                redirect: "/orders/o-1?placed=1".to_string()
            }
        );
        assert_eq!(wizard.step(), CheckoutStep::Submitted);
        assert_eq!(wizard.form(), &CheckoutFormData::default());
        assert!(!wizard.is_submitting());
    }

    #[tokio::test]
    async fn test_online_submit_hands_off_to_gateway() {
        let mut wizard = CheckoutWizard::new(filled_form(PaymentMethod::Online));
        wizard.next_step();
        let submitter = RecordingSubmitter::ok(Some(RazorpayOrder {
            id: "order_rzp_1".to_string(),
            amount: 129_900,
            currency: "INR".to_string(),
        }));

        let outcome = wizard.submit(&submitter).await.unwrap();

        assert!(matches!(
            outcome,
            CheckoutOutcome::PaymentRequired { ref razorpay_order_id, amount: 129_900, .. }
                if razorpay_order_id == "order_rzp_1"
        ));
    }

    #[tokio::test]
    async fn test_failed_submit_sets_inline_error_and_keeps_key() {
        let mut wizard = CheckoutWizard::new(filled_form(PaymentMethod::Cod));
        wizard.next_step();
        let key = wizard.idempotency_key().unwrap().to_string();

        let err = wizard
            .submit(&RecordingSubmitter::failing("Rose Toner is out of stock"))
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::Failed("Rose Toner is out of stock".to_string()));
        assert_eq!(wizard.error(), Some("Rose Toner is out of stock"));
        assert_eq!(wizard.step(), CheckoutStep::Review);
        assert_eq!(wizard.idempotency_key(), Some(key.as_str()));
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_second_submit_while_in_flight_is_refused() {
        let mut wizard = CheckoutWizard::new(filled_form(PaymentMethod::Cod));
        wizard.next_step();

        let pending = wizard.begin_submit().unwrap();
        assert_eq!(wizard.begin_submit(), Err(CheckoutError::InFlight));
        assert_eq!(wizard.prev_step(), CheckoutStep::Review);

        wizard
            .finish_submit(Err("Payment gateway unavailable".to_string()))
            .unwrap_err();
        let retry = wizard.begin_submit().unwrap();
        assert_eq!(retry.idempotency_key, pending.idempotency_key);
    }

    #[test]
    fn test_submit_requires_review_step() {
        let mut wizard = CheckoutWizard::default();
        assert!(matches!(
            wizard.begin_submit(),
            Err(CheckoutError::WrongStep { .. })
        ));
    }

    #[test]
    fn test_review_summary_is_derived() {
        let mut form = filled_form(PaymentMethod::Cod);
        form.notes = "  ".to_string();
        let summary = ReviewSummary::build(&form, &[item("499.00", 1), item("1598.00", 2)]);

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.items_total, "2097.00".parse::<Decimal>().unwrap());
        assert_eq!(summary.billing_address, summary.shipping_address);
        assert_eq!(summary.payment_label, "Cash on delivery");
        assert!(summary.notes.is_none());
    }

    #[test]
    fn test_request_uses_shipping_for_billing_when_same() {
        let request = filled_form(PaymentMethod::Cod).to_request();
        assert_eq!(request.billing_address, request.shipping_address);
        assert_eq!(request.address_id, Some(AddressId::new("a1")));
        assert!(request.notes.is_none());
    }

    #[test]
    fn test_patch_applies_present_fields_only() {
        let mut form = filled_form(PaymentMethod::Cod);
        CheckoutPatch {
            phone: Some("9000000000".to_string()),
            payment_method: Some(PaymentMethod::Online),
            ..CheckoutPatch::default()
        }
        .apply(&mut form);

        assert_eq!(form.contact.phone, "9000000000");
        assert_eq!(form.contact.full_name, "Asha Rao");
        assert_eq!(form.payment_method, PaymentMethod::Online);
    }

    #[test]
    fn test_wizard_survives_session_round_trip() {
        let mut wizard = CheckoutWizard::new(filled_form(PaymentMethod::Online));
        wizard.next_step();
        let json = serde_json::to_string(&wizard).unwrap();
        let restored: CheckoutWizard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, wizard);
    }
}
