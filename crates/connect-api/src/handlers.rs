//! # Request Handlers
//!
//! Axum request handlers for the connect demo: the authorization callback,
//! the payment endpoint, and the demo page.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Json,
};
use connect_core::{
    ConnectError, ConnectResult, CurrencyCode, PaymentRequest, SessionRecord,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// Fixed demonstration payment: 0.05 USD to the user's own handle
const DEMO_PAYMENT_AMOUNT: f64 = 0.05;
const DEMO_PAYMENT_CURRENCY: CurrencyCode = CurrencyCode::USD;
const DEMO_PAYMENT_DESCRIPTION: &str = "Testing Connect SDK";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query parameters delivered by the provider's consent redirect
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCallbackParams {
    /// Authorization token minted by the provider
    #[serde(default)]
    pub auth_token: Option<String>,
}

/// Query parameters of the demo page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeParams {
    #[serde(default)]
    pub session_token: Option<String>,
}

/// Successful payment response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub status: &'static str,
    pub transaction_id: String,
}

/// Map an error to its HTTP status and wire body.
///
/// The status always comes from [`ConnectError::status_code`]; only the body
/// shape varies, matching what the browser-side demo expects for each case.
fn error_response(err: ConnectError) -> (StatusCode, Json<serde_json::Value>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = match &err {
        ConnectError::MissingAuthorization => serde_json::json!({
            "error": err.to_string(),
        }),
        ConnectError::InvalidSessionToken
        | ConnectError::ExpiredSessionToken
        | ConnectError::ExpiredAuthorization => serde_json::json!({
            "status": "error",
            "error": err.to_string(),
        }),
        _ => serde_json::json!({
            "status": "error",
            "message": err.to_string(),
        }),
    };

    (status, Json(body))
}

/// Extract the session token from a `Bearer <token>` authorization header
fn bearer_token(headers: &HeaderMap) -> ConnectResult<&str> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ConnectError::MissingAuthorization)?;

    if token.is_empty() {
        return Err(ConnectError::MissingAuthorization);
    }

    Ok(token)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "handcash-connect-demo",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Authorization callback: the provider redirects here after user consent.
///
/// Single pass, no retries. The store write happens before the redirect is
/// sent so a payment fired immediately after the redirect cannot race an
/// unset entry.
#[instrument(skip(state, params))]
pub async fn auth_success(
    State(state): State<AppState>,
    Query(params): Query<AuthCallbackParams>,
) -> Result<Redirect, (StatusCode, Json<serde_json::Value>)> {
    let auth_token = params
        .auth_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            error_response(ConnectError::InvalidRequest(
                "Missing authToken query parameter".to_string(),
            ))
        })?
        .into();

    let user = state.account.get_profile(&auth_token).await.map_err(|e| {
        error!("Profile lookup failed: {}", e);
        error_response(e)
    })?;

    let record = SessionRecord::new(user);
    let session_token = state.codec.issue(&record).map_err(error_response)?;

    state
        .store
        .put(auth_token, record.session_id)
        .await
        .map_err(error_response)?;

    info!(
        "Authorized session {} for handle {}",
        record.session_id, record.user.handle
    );

    Ok(Redirect::to(&format!("/?sessionToken={}", session_token)))
}

/// Payment endpoint: verifies the bearer session token, resolves the stored
/// authorization token, and pays the fixed demo amount to the session's own
/// handle.
///
/// Payments are not deduplicated; two rapid calls execute two transfers.
#[instrument(skip_all)]
pub async fn pay(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PayResponse>, (StatusCode, Json<serde_json::Value>)> {
    let session_token = bearer_token(&headers).map_err(error_response)?;

    let record = state.codec.verify(session_token).map_err(|e| {
        warn!("Session token rejected: {}", e);
        error_response(e)
    })?;

    let auth_token = state
        .store
        .get(record.session_id)
        .await
        .map_err(error_response)?
        .ok_or(ConnectError::ExpiredAuthorization)
        .map_err(error_response)?;

    let request = PaymentRequest::new(
        &record.user.handle,
        DEMO_PAYMENT_AMOUNT,
        DEMO_PAYMENT_CURRENCY,
    )
    .with_description(DEMO_PAYMENT_DESCRIPTION);

    let confirmation = state.account.pay(&auth_token, &request).await.map_err(|e| {
        error!("Payment failed: {}", e);
        error_response(e)
    })?;

    info!(
        "Payment sent for session {}: transaction {}",
        record.session_id, confirmation.transaction_id
    );

    Ok(Json(PayResponse {
        status: "sent",
        transaction_id: confirmation.transaction_id,
    }))
}

/// Demo page: connect link when no session yet, otherwise the connected
/// user and a pay button.
///
/// The session token here is only displayed back to its owner, so this uses
/// the non-verifying `decode`; a token that does not even parse falls back
/// to the disconnected view. Authorization always goes through `verify` in
/// [`pay`].
pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<HomeParams>,
) -> impl IntoResponse {
    let session = params
        .session_token
        .as_deref()
        .and_then(|token| state.codec.decode(token));

    match (params.session_token, session) {
        (Some(token), Some(record)) => Html(connected_page(&token, &record)),
        _ => Html(connect_page(&state.account.redirection_url())),
    }
}

fn connect_page(redirection_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>HandCash Connect Demo</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%); color: white;">
    <div style="text-align: center;">
        <h1>Welcome to HandCash Connect</h1>
        <p>Connect your HandCash account to this app to run the demo payment.</p>
        <a href="{}" style="display: inline-block; margin-top: 24px; padding: 16px 32px; border-radius: 12px; background: #38cb7c; color: white; text-decoration: none; font-weight: bold;">Connect HandCash</a>
    </div>
</body>
</html>
"#,
        redirection_url
    )
}

fn connected_page(session_token: &str, record: &SessionRecord) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>HandCash Connect Demo</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%); color: white;">
    <div style="text-align: center;">
        <img src="{avatar}" style="width: 56px; height: 56px; border-radius: 50%;"/>
        <p>Connected as <strong>${handle}</strong></p>
        <button onclick="pay()" style="padding: 16px 32px; border-radius: 12px; border: none; background: #38cb7c; color: white; font-weight: bold; cursor: pointer;">Pay 0.05 USD to yourself</button>
        <p id="result"></p>
    </div>
    <script>
        async function pay() {{
            document.getElementById('result').textContent = 'Sending...';
            const response = await fetch('/api/pay', {{
                method: 'POST',
                headers: {{'Authorization': 'Bearer {token}'}},
            }});
            const body = await response.json();
            document.getElementById('result').textContent =
                body.status === 'sent' ? 'Payment sent! Transaction: ' + body.transactionId
                                       : 'Payment failed: ' + (body.error || body.message);
        }}
    </script>
</body>
</html>
"#,
        avatar = escape_html(&record.user.avatar_url),
        handle = escape_html(&record.user.handle),
        token = escape_html(session_token),
    )
}

/// Minimal HTML entity escaping for values reflected into the demo page.
///
/// The query-supplied token and the record `decode` pulls out of it are
/// attacker-controlled (`decode` checks no signature), so every
/// interpolation goes through this. A genuine token is base64url/hex and
/// passes through unchanged.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
