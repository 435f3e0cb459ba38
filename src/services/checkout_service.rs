use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{CurrentUser, CustomerDetails, PaymentMethod, PaymentStatus};

use super::cart_service::CartStore;
use super::gateway::{CardDetails, GatewayError, PaymentGateway};
use super::notifier::OrderNotifier;
use super::order_service::OrderStore;
use super::order_splitter;
use super::pricing_service::{self, PromoOutcome};
use super::FieldErrors;

/// Orchestrator states. Card flow walks Idle -> AwaitingGatewayToken ->
/// GatewayConfirming -> Succeeded | Failed; COD skips the gateway entirely
/// with Idle -> Placing -> Succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPhase {
    Idle,
    AwaitingGatewayToken,
    GatewayConfirming,
    Placing,
    Succeeded,
    Failed,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Rejected before any external call.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// Gateway decline, network failure, or timeout. Cart and order state are
    /// untouched; no money moved.
    #[error("payment failed: {reason}")]
    Gateway { reason: String },

    /// The charge went through but the order could not be recorded. The most
    /// severe class: the caller must escalate, not claim the order failed.
    #[error("payment succeeded but order recording failed: {reason}")]
    RecordingFailed { reason: String },

    /// COD persistence failure. No money moved.
    #[error("order could not be placed: {reason}")]
    Placement { reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    // "card" or "cod"
    pub payment_method: String,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub card: Option<CardDetails>,
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: String,
    pub email: String,
    pub total: f64,
    pub payment_status: PaymentStatus,
    /// Set when a promo code was supplied but not recognized; the order went
    /// through at full price and the caller must surface the rejection.
    pub promo_rejected: bool,
}

fn validate_customer(req: &CheckoutRequest) -> Result<CustomerDetails, FieldErrors> {
    let mut errs: FieldErrors = FieldErrors::new();

    let required = [
        ("full_name", &req.full_name),
        ("email", &req.email),
        ("address", &req.address),
        ("city", &req.city),
        ("state", &req.state),
        ("zip_code", &req.zip_code),
        ("country", &req.country),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errs.insert(field.into(), "This field is required.".into());
        }
    }

    if !req.email.trim().is_empty() {
        let email_re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_err(|_| {
            let mut e = FieldErrors::new();
            e.insert("_form".into(), "Server error. Please try again.".into());
            e
        })?;
        if !email_re.is_match(req.email.trim()) {
            errs.insert("email".into(), "Enter a valid email address.".into());
        }
    }

    if !errs.is_empty() {
        return Err(errs);
    }

    Ok(CustomerDetails {
        full_name: req.full_name.trim().to_string(),
        email: req.email.trim().to_string(),
        address: req.address.trim().to_string(),
        city: req.city.trim().to_string(),
        state: req.state.trim().to_string(),
        zip_code: req.zip_code.trim().to_string(),
        country: req.country.trim().to_string(),
    })
}

fn parse_method(req: &CheckoutRequest) -> Result<PaymentMethod, FieldErrors> {
    match req.payment_method.trim().to_lowercase().as_str() {
        "card" => Ok(PaymentMethod::Card),
        "cod" => Ok(PaymentMethod::Cod),
        _ => {
            let mut errs = FieldErrors::new();
            errs.insert(
                "payment_method".into(),
                "Choose card or cash on delivery.".into(),
            );
            Err(errs)
        }
    }
}

/// Drives the card flow against the gateway. Returns only after the gateway
/// reports success; any decline, network error, or timeout maps to a gateway
/// failure and nothing has been persisted. The caller may abandon (drop) this
/// at any point with the same guarantee.
///
/// `leg_timeout` bounds each gateway round trip, so a stalled gateway can
/// never hang a checkout; a timed-out leg is treated exactly like a gateway
/// failure.
async fn run_card_flow<G: PaymentGateway>(
    gateway: &G,
    amount_minor: i64,
    currency: &str,
    card: &CardDetails,
    customer: &CustomerDetails,
    leg_timeout: Duration,
) -> Result<(), GatewayError> {
    let mut phase = PaymentPhase::Idle;
    tracing::debug!(?phase, "starting card flow");

    phase = PaymentPhase::AwaitingGatewayToken;
    tracing::debug!(?phase, amount_minor, currency, "requesting payment token");
    let token = match tokio::time::timeout(
        leg_timeout,
        gateway.create_payment_intent(amount_minor, currency),
    )
    .await
    {
        Ok(res) => res?,
        Err(_) => return Err(GatewayError::Timeout),
    };

    phase = PaymentPhase::GatewayConfirming;
    tracing::debug!(?phase, token = %token.0, "confirming payment");
    match tokio::time::timeout(leg_timeout, gateway.confirm(&token, card, customer)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(GatewayError::Timeout),
    }
}

/// The full checkout: snapshot + validate, price, split, pay, persist,
/// notify, clear. Payment success strictly precedes order durability on the
/// card path, so a persisted order always corresponds to a real charge.
#[allow(clippy::too_many_arguments)]
pub async fn place_order<G: PaymentGateway, S: OrderStore>(
    gateway: &G,
    store: &S,
    notifier: &OrderNotifier,
    carts: &CartStore,
    user: &CurrentUser,
    req: &CheckoutRequest,
    currency: &str,
    gateway_timeout: Duration,
) -> Result<PlacedOrder, CheckoutError> {
    // All validation happens before any external call.
    let snapshot = carts.snapshot(user.id);
    if snapshot.is_empty() {
        let mut errs = FieldErrors::new();
        errs.insert("_form".into(), "Your cart is empty.".into());
        return Err(CheckoutError::Validation(errs));
    }

    let customer = validate_customer(req).map_err(CheckoutError::Validation)?;
    let method = parse_method(req).map_err(CheckoutError::Validation)?;

    let (priced, promo_outcome) = pricing_service::price_cart(&snapshot, req.promo_code.as_deref());
    let promo_rejected = matches!(promo_outcome, PromoOutcome::Invalid { .. });

    let order_id = order_splitter::new_order_id();
    let created_at = Utc::now().timestamp();

    let payment_status = match method {
        PaymentMethod::Card => {
            let Some(card) = req.card.as_ref() else {
                let mut errs = FieldErrors::new();
                errs.insert("card".into(), "Card details are required.".into());
                return Err(CheckoutError::Validation(errs));
            };

            let amount_minor = pricing_service::to_minor_units(priced.total);
            run_card_flow(
                gateway,
                amount_minor,
                currency,
                card,
                &customer,
                gateway_timeout,
            )
            .await
            .map_err(|e| {
                tracing::info!(order_id = %order_id, phase = ?PaymentPhase::Failed, error = %e, "card payment failed");
                CheckoutError::Gateway {
                    reason: e.to_string(),
                }
            })?;

            PaymentStatus::Paid
        }
        PaymentMethod::Cod => {
            tracing::debug!(order_id = %order_id, phase = ?PaymentPhase::Placing, "placing cod order");
            PaymentStatus::Pending
        }
    };

    let (order, shards) = order_splitter::split(
        &priced,
        &order_id,
        user.id,
        &customer,
        method,
        payment_status,
        created_at,
    );

    store.create_order(&order, &shards).await.map_err(|e| match method {
        // Money has already moved: report this distinctly so the caller can
        // escalate instead of silently losing the purchase.
        PaymentMethod::Card => CheckoutError::RecordingFailed {
            reason: e.to_string(),
        },
        PaymentMethod::Cod => CheckoutError::Placement {
            reason: e.to_string(),
        },
    })?;

    tracing::info!(
        order_id = %order_id,
        phase = ?PaymentPhase::Succeeded,
        method = method.as_str(),
        total = priced.total,
        shards = shards.len(),
        "order placed"
    );

    notifier.notify_in_background(
        order_id.clone(),
        customer.full_name.clone(),
        customer.email.clone(),
    );

    // The cart is destroyed only after a terminal payment outcome.
    carts.clear(user.id);

    Ok(PlacedOrder {
        order_id,
        email: customer.email,
        total: priced.total,
        payment_status,
        promo_rejected,
    })
}
