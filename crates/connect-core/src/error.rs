//! # Connect Error Types
//!
//! Typed error handling for the HandCash Connect demo flow.
//! All connect operations return `Result<T, ConnectError>`.

use thiserror::Error;

/// Core error type for session and payment operations
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No (or malformed) bearer header on a request that requires one
    #[error("Missing authorization.")]
    MissingAuthorization,

    /// Session token failed the signature or parse check.
    /// Parse and signature failures are deliberately indistinguishable.
    #[error("Invalid session token.")]
    InvalidSessionToken,

    /// Session token is well-formed and signed but past its expiry
    #[error("Expired session token.")]
    ExpiredSessionToken,

    /// Session is valid but no authorization token remains in the store
    #[error("Expired authorization.")]
    ExpiredAuthorization,

    /// Account provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConnectError {
    /// Returns the HTTP status code appropriate for this error.
    ///
    /// This is the single dispatch table from error kind to status; handlers
    /// must not invent their own mapping. Invalid/expired session tokens are
    /// authorization failures (401), matching the missing-header and
    /// expired-authorization cases.
    pub fn status_code(&self) -> u16 {
        match self {
            ConnectError::Configuration(_) => 500,
            ConnectError::InvalidRequest(_) => 400,
            ConnectError::MissingAuthorization => 401,
            ConnectError::InvalidSessionToken => 401,
            ConnectError::ExpiredSessionToken => 401,
            ConnectError::ExpiredAuthorization => 401,
            ConnectError::Provider { .. } => 502,
            ConnectError::Network(_) => 503,
            ConnectError::Serialization(_) => 500,
            ConnectError::Internal(_) => 500,
        }
    }

    /// Returns true if this error means the caller must re-authorize
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            ConnectError::MissingAuthorization
                | ConnectError::InvalidSessionToken
                | ConnectError::ExpiredSessionToken
                | ConnectError::ExpiredAuthorization
        )
    }
}

/// Result type alias for connect operations
pub type ConnectResult<T> = Result<T, ConnectError>;
