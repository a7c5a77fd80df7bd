/// Payment provider client
///
/// Speaks a Stripe-style payment-intent API over HTTPS. Only intent
/// creation is needed; confirmation happens client-side against the
/// provider using the returned client secret.
use crate::error::{Result, ServerError};
use aria_core::types::OrderId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

/// A created payment intent
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug, Serialize)]
struct CreateIntentRequest<'a> {
    amount: i64,
    currency: &'a str,
    metadata: IntentMetadata,
}

#[derive(Debug, Serialize)]
struct IntentMetadata {
    order_id: OrderId,
}

impl PaymentClient {
    pub fn new(base_url: String, secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
        }
    }

    /// Create a payment intent for an order. The amount is in the
    /// currency's smallest unit (cents).
    pub async fn create_intent(
        &self,
        order_id: OrderId,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent> {
        let url = format!("{}/v1/payment_intents", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&CreateIntentRequest {
                amount: amount_cents,
                currency,
                metadata: IntentMetadata { order_id },
            })
            .send()
            .await
            .map_err(|e| ServerError::PaymentInitiation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServerError::PaymentInitiation(format!(
                "provider returned {status}: {body}"
            )));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| ServerError::PaymentInitiation(e.to_string()))
    }
}
