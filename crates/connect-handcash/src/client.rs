//! # HandCash Connect Client
//!
//! REST client for the HandCash Connect API implementing [`AccountApi`].
//!
//! One `reqwest::Client` is built at startup and reused for every call; the
//! per-user authorization token travels as a request header, never as client
//! state.

use crate::config::HandCashConfig;
use async_trait::async_trait;
use connect_core::{
    AccountApi, AuthToken, ConnectError, ConnectResult, PaymentConfirmation, PaymentRequest,
    UserPublicProfile,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// HandCash Connect account client
pub struct HandCashClient {
    config: HandCashConfig,
    client: Client,
}

impl HandCashClient {
    /// Create a new client from explicit configuration
    pub fn new(config: HandCashConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> ConnectResult<Self> {
        let config = HandCashConfig::from_env()?;
        Ok(Self::new(config))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Map a non-success response body to a provider error, preferring the
    /// structured message when the body parses
    fn provider_error(status: reqwest::StatusCode, body: &str) -> ConnectError {
        error!("HandCash API error: status={}, body={}", status, body);

        if let Ok(error_response) = serde_json::from_str::<HandCashErrorResponse>(body) {
            return ConnectError::Provider {
                provider: "handcash".to_string(),
                message: error_response.message,
            };
        }

        ConnectError::Provider {
            provider: "handcash".to_string(),
            message: format!("HTTP {}: {}", status, body),
        }
    }
}

#[async_trait]
impl AccountApi for HandCashClient {
    #[instrument(skip(self, auth_token))]
    async fn get_profile(&self, auth_token: &AuthToken) -> ConnectResult<UserPublicProfile> {
        debug!("Fetching current user profile");

        let response = self
            .client
            .get(self.endpoint("/v1/connect/profile/currentUserProfile"))
            .header("app-id", &self.config.app_id)
            .header("app-secret", &self.config.app_secret)
            .header("auth-token", auth_token.expose())
            .send()
            .await
            .map_err(|e| ConnectError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ConnectError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::provider_error(status, &body));
        }

        let profile: HandCashProfileResponse = serde_json::from_str(&body).map_err(|e| {
            ConnectError::Serialization(format!("Failed to parse profile response: {}", e))
        })?;

        info!("Fetched profile for handle={}", profile.public_profile.handle);

        Ok(UserPublicProfile {
            handle: profile.public_profile.handle,
            display_name: profile.public_profile.display_name,
            avatar_url: profile.public_profile.avatar_url,
        })
    }

    #[instrument(skip(self, auth_token, request), fields(destination = %request.destination))]
    async fn pay(
        &self,
        auth_token: &AuthToken,
        request: &PaymentRequest,
    ) -> ConnectResult<PaymentConfirmation> {
        let pay_request = HandCashPayRequest {
            description: request.description.clone(),
            payments: vec![HandCashPaymentOrder {
                destination: request.destination.clone(),
                amount: request.amount,
                currency_code: request.currency_code.as_str().to_string(),
            }],
        };

        debug!(
            "Sending payment: {} {} to {}",
            request.amount,
            request.currency_code.as_str(),
            request.destination
        );

        let response = self
            .client
            .post(self.endpoint("/v1/connect/wallet/pay"))
            .header("app-id", &self.config.app_id)
            .header("app-secret", &self.config.app_secret)
            .header("auth-token", auth_token.expose())
            .json(&pay_request)
            .send()
            .await
            .map_err(|e| ConnectError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ConnectError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::provider_error(status, &body));
        }

        let payment: HandCashPayResponse = serde_json::from_str(&body).map_err(|e| {
            ConnectError::Serialization(format!("Failed to parse payment response: {}", e))
        })?;

        info!("Payment sent: transaction_id={}", payment.transaction_id);

        Ok(PaymentConfirmation {
            transaction_id: payment.transaction_id,
        })
    }

    fn redirection_url(&self) -> String {
        self.config.authorization_url()
    }

    fn provider_name(&self) -> &'static str {
        "handcash"
    }
}

// =============================================================================
// HandCash API Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HandCashProfileResponse {
    public_profile: HandCashPublicProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HandCashPublicProfile {
    handle: String,
    display_name: String,
    avatar_url: String,
}

#[derive(Debug, Serialize)]
struct HandCashPayRequest {
    description: String,
    payments: Vec<HandCashPaymentOrder>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HandCashPaymentOrder {
    destination: String,
    amount: f64,
    currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HandCashPayResponse {
    transaction_id: String,
}

#[derive(Debug, Deserialize)]
struct HandCashErrorResponse {
    message: String,
}
