//! # connect-handcash
//!
//! HandCash Connect account client for handcash-connect-demo.
//!
//! Implements the [`connect_core::AccountApi`] trait against the HandCash
//! Connect REST API: current-user profile lookup, wallet payments, and the
//! authorization redirect URL.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use connect_handcash::HandCashClient;
//! use connect_core::{AccountApi, AuthToken, CurrencyCode, PaymentRequest};
//!
//! // Create the client once from environment
//! let client = HandCashClient::from_env()?;
//!
//! // Exchange the authorization token for a profile
//! let profile = client.get_profile(&AuthToken::new(auth_token)).await?;
//!
//! // Pay 0.05 USD to the user's own handle
//! let request = PaymentRequest::new(&profile.handle, 0.05, CurrencyCode::USD)
//!     .with_description("Testing Connect SDK");
//! let confirmation = client.pay(&AuthToken::new(auth_token), &request).await?;
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::HandCashClient;
pub use config::HandCashConfig;
