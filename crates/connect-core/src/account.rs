//! # Account API Trait
//!
//! Seam between the web layer and the external payment-account provider.
//! The HandCash client implements this trait; tests substitute a mock.
//!
//! Each call that acts on a user's account takes the stored [`AuthToken`] as
//! an explicit parameter. The client itself is constructed once at startup;
//! there is no per-request client binding.

use crate::error::ConnectResult;
use crate::session::UserPublicProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque authorization credential issued by the account provider.
///
/// Proves the app's right to act on a user's account. Held server-side only;
/// it must never appear in anything sent to the browser, including logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Reveals the raw credential for use in a provider API call
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Currency for a payment amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyCode {
    USD,
    EUR,
    GBP,
    BSV,
    SAT,
}

impl CurrencyCode {
    /// Returns the code string the provider API expects
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "USD",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::BSV => "BSV",
            CurrencyCode::SAT => "SAT",
        }
    }
}

/// A single-destination payment order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Receiving handle
    pub destination: String,

    /// Amount in `currency_code` units
    pub amount: f64,

    /// Payment currency
    pub currency_code: CurrencyCode,

    /// Free-form description attached to the transaction
    pub description: String,
}

impl PaymentRequest {
    pub fn new(destination: impl Into<String>, amount: f64, currency_code: CurrencyCode) -> Self {
        Self {
            destination: destination.into(),
            amount,
            currency_code,
            description: String::new(),
        }
    }

    /// Builder: set the transaction description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Result of a completed payment call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    /// Provider transaction identifier
    pub transaction_id: String,
}

/// Core trait for the external payment-account provider.
///
/// Kept deliberately narrow: the demo only ever fetches a profile, sends one
/// payment, and mints the authorization redirect URL.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Fetch the public profile the given authorization token grants access to
    async fn get_profile(&self, auth_token: &AuthToken) -> ConnectResult<UserPublicProfile>;

    /// Execute a payment on the authorized user's account.
    ///
    /// Payments are at-most-once: no retries, no idempotency key. A failed
    /// call must be surfaced, never replayed.
    async fn pay(
        &self,
        auth_token: &AuthToken,
        request: &PaymentRequest,
    ) -> ConnectResult<PaymentConfirmation>;

    /// URL the browser is sent to for user consent
    fn redirection_url(&self) -> String;

    /// Get the provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared account API client (dynamic dispatch)
pub type BoxedAccountApi = Arc<dyn AccountApi>;
