//! # HandCash Connect Demo
//!
//! Demonstration backend for the HandCash Connect authorization and
//! payment flow.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export HANDCASH_APP_ID=...
//! export HANDCASH_APP_SECRET=...
//!
//! # Run the server
//! handcash-connect-demo
//! ```

use connect_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Account provider: {}", state.account.provider_name());
    info!(
        "Session TTL: {}s, auth token TTL: {}s",
        state.config.session_ttl_secs, state.config.auth_token_ttl_secs
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("HandCash Connect demo starting on http://{}", addr);

    if !is_prod {
        info!("Demo page: http://{}/", addr);
        info!("Callback: GET http://{}/api/auth/handcash/success", addr);
        info!("Payment: POST http://{}/api/pay", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
