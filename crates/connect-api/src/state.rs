//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the account client, session token codec, authorization token
//! store, and configuration. All of it is constructed once at startup and
//! injected into handlers; nothing here is process-global.

use chrono::Duration;
use connect_core::{BoxedAccountApi, BoxedAuthTokenStore, MemoryAuthTokenStore, SessionTokenCodec};
use connect_handcash::{HandCashClient, HandCashConfig};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Session token lifetime in seconds
    pub session_ttl_secs: i64,
    /// Stored authorization token lifetime in seconds
    pub auth_token_ttl_secs: i64,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
            auth_token_ttl_secs: std::env::var("AUTH_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// External account provider client
    pub account: BoxedAccountApi,
    /// Session token codec
    pub codec: SessionTokenCodec,
    /// Authorization token store
    pub store: BoxedAuthTokenStore,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the production state: HandCash client, in-memory token store,
    /// session tokens signed with the app secret.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let handcash_config = HandCashConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize HandCash: {}", e))?;

        let codec = SessionTokenCodec::new(
            handcash_config.app_secret.clone(),
            Duration::seconds(config.session_ttl_secs),
        );
        let store = Arc::new(MemoryAuthTokenStore::new(Duration::seconds(
            config.auth_token_ttl_secs,
        )));
        let account = Arc::new(HandCashClient::new(handcash_config));

        Ok(Self {
            account,
            codec,
            store,
            config,
        })
    }

    /// Assemble state from explicit parts (used by tests and alternative
    /// store/provider wiring)
    pub fn with_parts(
        account: BoxedAccountApi,
        codec: SessionTokenCodec,
        store: BoxedAuthTokenStore,
        config: AppConfig,
    ) -> Self {
        Self {
            account,
            codec,
            store,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("SESSION_TTL_SECS");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_ttl_secs, 86_400);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            session_ttl_secs: 3600,
            auth_token_ttl_secs: 3600,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }
}
