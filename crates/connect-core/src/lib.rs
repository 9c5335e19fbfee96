//! # connect-core
//!
//! Core types and traits for the handcash-connect-demo flow.
//!
//! This crate provides:
//! - `AccountApi` trait for the external payment-account provider
//! - `SessionTokenCodec` for the signed token the browser holds
//! - `AuthTokenStore` for the server-side authorization token cache
//! - `SessionRecord` and `UserPublicProfile` session types
//! - `ConnectError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use connect_core::{SessionRecord, SessionTokenCodec, MemoryAuthTokenStore};
//!
//! // Exchange the provider authorization token for a profile
//! let profile = account.get_profile(&auth_token).await?;
//!
//! // Mint a browser session and sign it
//! let record = SessionRecord::new(profile);
//! let session_token = codec.issue(&record)?;
//!
//! // Remember the authorization token for the payment endpoint
//! store.put(auth_token, record.session_id).await?;
//! ```

pub mod account;
pub mod error;
pub mod session;
pub mod store;
pub mod token;

// Re-exports for convenience
pub use account::{
    AccountApi, AuthToken, BoxedAccountApi, CurrencyCode, PaymentConfirmation, PaymentRequest,
};
pub use error::{ConnectError, ConnectResult};
pub use session::{SessionRecord, UserPublicProfile};
pub use store::{AuthTokenStore, BoxedAuthTokenStore, MemoryAuthTokenStore};
pub use token::SessionTokenCodec;
