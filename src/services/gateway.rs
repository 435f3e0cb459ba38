use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::CustomerDetails;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("STRIPE_SECRET_KEY is missing in .env")]
    MissingKey,
    #[error("payment declined: {0}")]
    Declined(String),
    #[error("gateway request failed: {0}")]
    Network(String),
    #[error("gateway confirmation timed out")]
    Timeout,
}

/// One-time token scoped to a single payment-intent amount.
#[derive(Debug, Clone)]
pub struct PaymentToken(pub String);

/// Card details as tokenized by the storefront client. The server never sees
/// a raw card number.
#[derive(Debug, Clone, Deserialize)]
pub struct CardDetails {
    pub payment_method_id: String,
}

/// The external payment-processing collaborator. The checkout flow is generic
/// over this so tests can drive it with scripted outcomes.
pub trait PaymentGateway {
    /// Requests a one-time payment token for the exact integer minor-unit
    /// amount of the checkout total.
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentToken, GatewayError>;

    /// Hands the token plus billing details to the gateway's confirmation
    /// step. `Ok(())` means the charge went through.
    async fn confirm(
        &self,
        token: &PaymentToken,
        card: &CardDetails,
        customer: &CustomerDetails,
    ) -> Result<(), GatewayError>;
}

#[derive(Clone)]
pub struct StripeGateway {
    http: Client,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    status: String,
    #[serde(default)]
    last_payment_error: Option<PaymentIntentError>,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentError {
    #[serde(default)]
    message: Option<String>,
}

impl StripeGateway {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: Client::new(),
            secret_key,
        }
    }

    fn has_key(&self) -> bool {
        !self.secret_key.trim().is_empty()
    }
}

impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentToken, GatewayError> {
        if !self.has_key() {
            return Err(GatewayError::MissingKey);
        }

        let url = "https://api.stripe.com/v1/payment_intents";
        let res = self
            .http
            .post(url)
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", currency.to_string()),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(GatewayError::Network(format!(
                "create payment intent failed: {status} {body}"
            )));
        }

        let intent = res
            .json::<PaymentIntentResponse>()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(PaymentToken(intent.id))
    }

    async fn confirm(
        &self,
        token: &PaymentToken,
        card: &CardDetails,
        customer: &CustomerDetails,
    ) -> Result<(), GatewayError> {
        if !self.has_key() {
            return Err(GatewayError::MissingKey);
        }

        let url = format!(
            "https://api.stripe.com/v1/payment_intents/{}/confirm",
            token.0
        );
        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&[
                ("payment_method", card.payment_method_id.clone()),
                ("receipt_email", customer.email.clone()),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(GatewayError::Declined(format!("{status} {body}")));
        }

        let intent = res
            .json::<PaymentIntentResponse>()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if intent.status != "succeeded" {
            let reason = intent
                .last_payment_error
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("payment intent status: {}", intent.status));
            return Err(GatewayError::Declined(reason));
        }

        Ok(())
    }
}
