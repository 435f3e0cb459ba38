use reqwest::Client;
use serde_json::json;

/// Best-effort order-notification collaborator (an external automation
/// webhook). Delivery never holds up the checkout response and a failure
/// never undoes an order.
#[derive(Clone)]
pub struct OrderNotifier {
    http: Client,
    webhook_url: String,
}

impl OrderNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: Client::new(),
            webhook_url,
        }
    }

    pub async fn notify(
        &self,
        order_id: &str,
        full_name: &str,
        email: &str,
    ) -> Result<(), String> {
        if self.webhook_url.trim().is_empty() {
            return Err("ORDER_WEBHOOK_URL is missing in .env".to_string());
        }

        let res = self
            .http
            .post(&self.webhook_url)
            .json(&json!({
                "orderId": order_id,
                "fullName": full_name,
                "email": email,
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("order webhook failed: {status} {body}"));
        }

        Ok(())
    }

    /// Fire-and-forget dispatch. Failures are logged, not retried and not
    /// surfaced to the buyer.
    pub fn notify_in_background(&self, order_id: String, full_name: String, email: String) {
        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&order_id, &full_name, &email).await {
                tracing::warn!(order_id = %order_id, error = %e, "order notification failed");
            }
        });
    }
}
