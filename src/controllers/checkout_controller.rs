use std::time::Duration;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::CurrentUser,
    services::{
        checkout_service::{self, CheckoutError, CheckoutRequest},
        pricing_service::{self, PromoOutcome},
        FieldErrors,
    },
    AppState,
};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

fn invalid(errs: &FieldErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "errors": errs })),
    )
        .into_response()
}

fn promo_json(outcome: &PromoOutcome) -> serde_json::Value {
    match outcome {
        PromoOutcome::NotProvided => json!({ "status": "none" }),
        PromoOutcome::Applied { code, fraction } => {
            json!({ "status": "applied", "code": code, "fraction": fraction })
        }
        PromoOutcome::Invalid { code } => {
            json!({ "status": "invalid", "code": code, "message": "Invalid promo code" })
        }
    }
}

#[derive(Deserialize)]
pub struct QuoteForm {
    #[serde(default)]
    pub promo_code: Option<String>,
}

// POST /checkout/quote — priced order summary, no side effects.
pub async fn post_quote(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(form): Json<QuoteForm>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let snapshot = state.carts.snapshot(u.id);
    if snapshot.is_empty() {
        let mut errs = FieldErrors::new();
        errs.insert("_form".into(), "Your cart is empty.".into());
        return invalid(&errs);
    }

    let (priced, outcome) = pricing_service::price_cart(&snapshot, form.promo_code.as_deref());

    (
        StatusCode::OK,
        Json(json!({
            "subtotal": priced.subtotal,
            "discount": priced.discount,
            "total": priced.total,
            "promo": promo_json(&outcome),
        })),
    )
        .into_response()
}

// POST /checkout
pub async fn post_checkout(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(req): Json<CheckoutRequest>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let result = checkout_service::place_order(
        &state.gateway,
        &state.orders,
        &state.notifier,
        &state.carts,
        &u,
        &req,
        &state.settings.currency,
        Duration::from_secs(state.settings.gateway_timeout_secs),
    )
    .await;

    match result {
        Ok(placed) => (
            StatusCode::CREATED,
            Json(json!({
                "order_id": placed.order_id,
                "email": placed.email,
                "total": placed.total,
                "payment_status": placed.payment_status,
                "promo_rejected": placed.promo_rejected,
            })),
        )
            .into_response(),
        Err(CheckoutError::Validation(errs)) => invalid(&errs),
        Err(e @ CheckoutError::Gateway { .. }) => (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        // Money moved; the message must not claim the order failed outright.
        Err(e @ CheckoutError::RecordingFailed { .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": e.to_string(),
                "escalate": true,
            })),
        )
            .into_response(),
        Err(e @ CheckoutError::Placement { .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
