//! Checkout wizard handlers.
//!
//! The wizard lives in the session between requests. Submission is
//! guarded twice: the in-flight registry refuses a concurrent submit from
//! the same visitor, and the wizard's idempotency key lets the backend
//! collapse a repeated submit of the same review.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::address::AddressBook;
use crate::api::ApiClient;
use crate::checkout::{
    CheckoutError, CheckoutFormData, CheckoutOutcome, CheckoutPatch, CheckoutStep,
    CheckoutWizard, ReviewSummary,
};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::VisitorApi;
use crate::models::VisitorSession;
use crate::notice::Notice;
use crate::state::AppState;

use super::Envelope;

/// In-flight action name for order submission.
const CHECKOUT_ACTION: &str = "checkout";

/// Everything the checkout page renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPage {
    pub step: CheckoutStep,
    pub form: CheckoutFormData,
    /// Required fields still empty on the details step.
    pub missing_fields: Vec<&'static str>,
    pub review: Option<ReviewSummary>,
    pub error: Option<String>,
    pub submitting: bool,
    pub outcome: Option<CheckoutOutcome>,
    /// Public key for the payment gateway hand-off.
    pub razorpay_key_id: Option<String>,
}

impl CheckoutPage {
    async fn build(state: &AppState, api: &ApiClient, wizard: &CheckoutWizard) -> Result<Self> {
        let review = if wizard.step() == CheckoutStep::Review {
            let cart = api.get_cart().await?;
            Some(wizard.review(&cart.items))
        } else {
            None
        };

        Ok(Self {
            step: wizard.step(),
            form: wizard.form().clone(),
            missing_fields: if wizard.step() == CheckoutStep::Details {
                wizard.form().missing_required_fields()
            } else {
                Vec::new()
            },
            review,
            error: wizard.error().map(String::from),
            submitting: wizard.is_submitting(),
            outcome: wizard.outcome().cloned(),
            razorpay_key_id: state.config().payments.razorpay_key_id.clone(),
        })
    }
}

/// Fill the shipping address from the selected or primary address when
/// the form has none yet. Failures only cost the prefill.
async fn prefill_shipping(
    api: &ApiClient,
    session: &VisitorSession,
    wizard: &mut CheckoutWizard,
) -> Result<()> {
    if wizard.step() != CheckoutStep::Details
        || wizard.form().shipping_address.is_some()
        || !api.has_token()
    {
        return Ok(());
    }

    let addresses = match api.list_addresses().await {
        Ok(addresses) => addresses,
        Err(e) => {
            warn!(error = %e, "Could not load addresses for checkout prefill");
            return Ok(());
        }
    };

    let mut book =
        AddressBook::new(0, addresses).with_selected(session.selected_address().await?);
    let Some(chosen) = book.preselect_primary().cloned() else {
        return Ok(());
    };

    session.set_selected_address(Some(&chosen.id)).await?;
    wizard.edit(|form| form.select_address(Some(&chosen)))?;
    session.set_checkout(wizard).await?;
    Ok(())
}

/// Current wizard state.
///
/// A finished checkout is shown once with its outcome, then the stored
/// wizard starts over.
///
/// # Errors
///
/// Returns an error if the session or the backend fails.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    VisitorApi(api): VisitorApi,
    session: VisitorSession,
) -> Result<Json<Envelope<CheckoutPage>>> {
    let mut wizard = session.checkout().await?;

    if wizard.step() == CheckoutStep::Submitted {
        let page = CheckoutPage::build(&state, &api, &wizard).await?;
        wizard.restart();
        session.set_checkout(&wizard).await?;
        return Ok(Envelope::ok(page));
    }

    prefill_shipping(&api, &session, &mut wizard).await?;
    Ok(Envelope::ok(CheckoutPage::build(&state, &api, &wizard).await?))
}

/// Update form fields on the details step.
///
/// # Errors
///
/// Returns 400 outside the details step.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    VisitorApi(api): VisitorApi,
    session: VisitorSession,
    Json(patch): Json<CheckoutPatch>,
) -> Result<Json<Envelope<CheckoutPage>>> {
    let mut wizard = session.checkout().await?;
    wizard.edit(|form| patch.apply(form))?;
    session.set_checkout(&wizard).await?;
    Ok(Envelope::ok(CheckoutPage::build(&state, &api, &wizard).await?))
}

/// Move from details to review.
///
/// Empty required fields are reported as a 422 the same way the browser's
/// `required` attribute would block the form; the wizard itself does not
/// validate.
///
/// # Errors
///
/// Returns 422 listing the empty required fields.
#[instrument(skip_all)]
pub async fn next(
    State(state): State<AppState>,
    VisitorApi(api): VisitorApi,
    session: VisitorSession,
) -> Result<Json<Envelope<CheckoutPage>>> {
    let mut wizard = session.checkout().await?;

    if wizard.step() == CheckoutStep::Details {
        let missing = wizard.form().missing_required_fields();
        if !missing.is_empty() {
            let errors: BTreeMap<_, _> = missing
                .into_iter()
                .map(|field| (field, "This field is required"))
                .collect();
            return Err(AppError::validation(
                "Please fill in the required fields",
                &errors,
            ));
        }
    }

    wizard.next_step();
    session.set_checkout(&wizard).await?;
    Ok(Envelope::ok(CheckoutPage::build(&state, &api, &wizard).await?))
}

/// Go back from review to details.
///
/// # Errors
///
/// Returns an error if the session fails.
#[instrument(skip_all)]
pub async fn back(
    State(state): State<AppState>,
    VisitorApi(api): VisitorApi,
    session: VisitorSession,
) -> Result<Json<Envelope<CheckoutPage>>> {
    let mut wizard = session.checkout().await?;
    wizard.prev_step();
    session.set_checkout(&wizard).await?;
    Ok(Envelope::ok(CheckoutPage::build(&state, &api, &wizard).await?))
}

/// Place the order.
///
/// # Errors
///
/// Returns 409 while a submission is in flight, 400 outside the review
/// step, or 422 with the backend's message when the order is refused.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    VisitorApi(api): VisitorApi,
    session: VisitorSession,
) -> Result<Json<Envelope<CheckoutPage>>> {
    let visitor = session.visitor_id().await?;
    let _ticket = state
        .in_flight()
        .try_begin(&visitor, CHECKOUT_ACTION)
        .ok_or(CheckoutError::InFlight)?;

    let mut wizard = session.checkout().await?;
    let method = wizard.form().payment_method.to_string();
    add_breadcrumb(
        "checkout",
        "Submitting order",
        Some(&[("payment_method", method.as_str())]),
    );

    let result = wizard.submit(&api).await;
    session.set_checkout(&wizard).await?;
    let outcome = result?;

    let notice = match &outcome {
        CheckoutOutcome::Confirmed { .. } => Notice::success("Order placed"),
        CheckoutOutcome::PaymentRequired { .. } => Notice::success("Redirecting to payment"),
    };
    Ok(Envelope::with_notice(
        CheckoutPage::build(&state, &api, &wizard).await?,
        notice,
    ))
}
