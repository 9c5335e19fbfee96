//! # HandCash Configuration
//!
//! Configuration management for the HandCash Connect integration.
//! All secrets are loaded from environment variables.

use connect_core::ConnectError;
use std::env;

/// HandCash Connect app configuration
#[derive(Debug, Clone)]
pub struct HandCashConfig {
    /// App identifier issued by the HandCash dashboard
    pub app_id: String,

    /// App secret issued by the HandCash dashboard
    pub app_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Base URL of the consent page the browser is redirected to
    pub redirect_base_url: String,
}

impl HandCashConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `HANDCASH_APP_ID`
    /// - `HANDCASH_APP_SECRET`
    pub fn from_env() -> Result<Self, ConnectError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let app_id = env::var("HANDCASH_APP_ID")
            .map_err(|_| ConnectError::Configuration("HANDCASH_APP_ID not set".to_string()))?;

        let app_secret = env::var("HANDCASH_APP_SECRET")
            .map_err(|_| ConnectError::Configuration("HANDCASH_APP_SECRET not set".to_string()))?;

        if app_id.trim().is_empty() {
            return Err(ConnectError::Configuration(
                "HANDCASH_APP_ID must not be empty".to_string(),
            ));
        }

        if app_secret.trim().is_empty() {
            return Err(ConnectError::Configuration(
                "HANDCASH_APP_SECRET must not be empty".to_string(),
            ));
        }

        Ok(Self {
            app_id,
            app_secret,
            api_base_url: "https://cloud.handcash.io".to_string(),
            redirect_base_url: "https://app.handcash.io".to_string(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            api_base_url: "https://cloud.handcash.io".to_string(),
            redirect_base_url: "https://app.handcash.io".to_string(),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// URL the browser visits to authorize this app
    pub fn authorization_url(&self) -> String {
        format!(
            "{}/#/authorizeApp?appId={}",
            self.redirect_base_url, self.app_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config() {
        let config = HandCashConfig::new("app123", "secret456");

        assert_eq!(config.app_id, "app123");
        assert_eq!(config.api_base_url, "https://cloud.handcash.io");
    }

    #[test]
    fn test_authorization_url_carries_app_id() {
        let config = HandCashConfig::new("app123", "secret456");

        assert_eq!(
            config.authorization_url(),
            "https://app.handcash.io/#/authorizeApp?appId=app123"
        );
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("HANDCASH_APP_ID");

        let result = HandCashConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_api_base_url() {
        let config = HandCashConfig::new("app123", "secret456")
            .with_api_base_url("http://127.0.0.1:9999");

        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
    }
}
