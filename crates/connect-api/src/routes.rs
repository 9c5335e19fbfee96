//! # Routes
//!
//! Axum router configuration for the connect demo.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /                              - Demo page (connect link / pay button)
/// - GET  /health                        - Health check
/// - GET  /api/auth/handcash/success     - Provider authorization callback
/// - POST /api/pay                       - Execute the demo payment
///
/// `/api/pay` is registered for POST only; other methods are rejected by the
/// router before the handler runs, so non-POST traffic can never reach the
/// payment provider.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the demo page and API share an origin, but keep
    // the layer permissive like the rest of the demo
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new().route("/handcash/success", get(handlers::auth_success));

    let api_routes = Router::new()
        .route("/pay", post(handlers::pay))
        .nest("/auth", auth_routes);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum::http::{header, HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use chrono::Duration;
    use connect_core::{
        AccountApi, AuthToken, AuthTokenStore, ConnectError, ConnectResult, MemoryAuthTokenStore,
        PaymentConfirmation, PaymentRequest, SessionRecord, SessionTokenCodec, UserPublicProfile,
    };
    use std::sync::{Arc, Mutex};

    /// Account provider double: hands out a fixed profile and records
    /// every payment it is asked to execute.
    #[derive(Default)]
    struct MockAccount {
        payments: Mutex<Vec<PaymentRequest>>,
        fail_profile: bool,
        fail_pay: bool,
    }

    #[async_trait]
    impl AccountApi for MockAccount {
        async fn get_profile(&self, _auth_token: &AuthToken) -> ConnectResult<UserPublicProfile> {
            if self.fail_profile {
                return Err(ConnectError::Provider {
                    provider: "mock".to_string(),
                    message: "profile lookup refused".to_string(),
                });
            }
            Ok(UserPublicProfile {
                handle: "alice".to_string(),
                display_name: "Alice".to_string(),
                avatar_url: "http://example.com/alice.png".to_string(),
            })
        }

        async fn pay(
            &self,
            _auth_token: &AuthToken,
            request: &PaymentRequest,
        ) -> ConnectResult<PaymentConfirmation> {
            if self.fail_pay {
                return Err(ConnectError::Provider {
                    provider: "mock".to_string(),
                    message: "payment refused".to_string(),
                });
            }
            self.payments.lock().unwrap().push(request.clone());
            Ok(PaymentConfirmation {
                transaction_id: "txid-1".to_string(),
            })
        }

        fn redirection_url(&self) -> String {
            "https://app.handcash.io/#/authorizeApp?appId=test-app".to_string()
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    struct TestApp {
        server: TestServer,
        account: Arc<MockAccount>,
        codec: SessionTokenCodec,
        store: MemoryAuthTokenStore,
    }

    fn test_app_with(account: MockAccount) -> TestApp {
        let account = Arc::new(account);
        let codec = SessionTokenCodec::new("test-secret", Duration::hours(1));
        let store = MemoryAuthTokenStore::new(Duration::minutes(30));
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            session_ttl_secs: 3600,
            auth_token_ttl_secs: 1800,
        };

        // Clones share the same underlying map, so tests can inspect the
        // store the handlers write to
        let state = AppState::with_parts(
            account.clone(),
            codec.clone(),
            Arc::new(store.clone()),
            config,
        );

        TestApp {
            server: TestServer::new(create_router(state)).unwrap(),
            account,
            codec,
            store,
        }
    }

    fn test_app() -> TestApp {
        test_app_with(MockAccount::default())
    }

    fn sample_record() -> SessionRecord {
        SessionRecord::new(UserPublicProfile {
            handle: "alice".to_string(),
            display_name: "Alice".to_string(),
            avatar_url: "http://example.com/alice.png".to_string(),
        })
    }

    fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        (
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_pay_happy_path() {
        let app = test_app();
        let record = sample_record();
        let token = app.codec.issue(&record).unwrap();
        app.store
            .put(AuthToken::new("tok123"), record.session_id)
            .await
            .unwrap();

        let (name, value) = bearer(&token);
        let response = app.server.post("/api/pay").add_header(name, value).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "sent");
        assert_eq!(body["transactionId"], "txid-1");

        let payments = app.account.payments.lock().unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].destination, "alice");
        assert_eq!(payments[0].amount, 0.05);
        assert_eq!(payments[0].description, "Testing Connect SDK");
    }

    #[tokio::test]
    async fn test_pay_without_authorization_header() {
        let app = test_app();

        let response = app.server.post("/api/pay").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body, serde_json::json!({"error": "Missing authorization."}));
        assert!(app.account.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pay_with_unknown_session_is_expired_authorization() {
        let app = test_app();

        // Valid, signed token whose session id was never stored
        let token = app.codec.issue(&sample_record()).unwrap();
        let (name, value) = bearer(&token);
        let response = app.server.post("/api/pay").add_header(name, value).await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "Expired authorization.");
        assert!(app.account.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pay_with_tampered_token_is_unauthorized() {
        let app = test_app();
        let record = sample_record();
        let token = app.codec.issue(&record).unwrap();
        app.store
            .put(AuthToken::new("tok123"), record.session_id)
            .await
            .unwrap();

        let flipped = if token.ends_with('0') { "1" } else { "0" };
        let tampered = format!("{}{}", &token[..token.len() - 1], flipped);
        let (name, value) = bearer(&tampered);
        let response = app.server.post("/api/pay").add_header(name, value).await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert!(app.account.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pay_provider_failure_is_bad_gateway() {
        let app = test_app_with(MockAccount {
            fail_pay: true,
            ..Default::default()
        });
        let record = sample_record();
        let token = app.codec.issue(&record).unwrap();
        app.store
            .put(AuthToken::new("tok123"), record.session_id)
            .await
            .unwrap();

        let (name, value) = bearer(&token);
        let response = app.server.post("/api/pay").add_header(name, value).await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("payment refused"));
    }

    #[tokio::test]
    async fn test_non_post_never_reaches_payment_api() {
        let app = test_app();
        let record = sample_record();
        app.store
            .put(AuthToken::new("tok123"), record.session_id)
            .await
            .unwrap();

        let response = app.server.get("/api/pay").await;

        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(app.account.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_auth_callback_issues_session_and_stores_token() {
        let app = test_app();

        let response = app
            .server
            .get("/api/auth/handcash/success")
            .add_query_param("authToken", "XYZ")
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let session_token = location
            .strip_prefix("/?sessionToken=")
            .expect("redirect should carry the session token");

        // The redirect token verifies and names the fetched profile
        let record = app.codec.verify(session_token).unwrap();
        assert_eq!(record.user.handle, "alice");
        assert_eq!(record.user.display_name, "Alice");

        // The authorization token was stored before the redirect was sent
        assert_eq!(
            app.store.get(record.session_id).await.unwrap(),
            Some(AuthToken::new("XYZ"))
        );
    }

    #[tokio::test]
    async fn test_auth_callback_without_token_is_bad_request() {
        let app = test_app();

        let response = app.server.get("/api/auth/handcash/success").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auth_callback_profile_failure_surfaces() {
        let app = test_app_with(MockAccount {
            fail_profile: true,
            ..Default::default()
        });

        let response = app
            .server
            .get("/api/auth/handcash/success")
            .add_query_param("authToken", "XYZ")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_home_without_session_shows_connect_link() {
        let app = test_app();

        let response = app.server.get("/").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("authorizeApp?appId=test-app"));
    }

    #[tokio::test]
    async fn test_home_with_session_shows_connected_user() {
        let app = test_app();
        let token = app.codec.issue(&sample_record()).unwrap();

        let response = app
            .server
            .get("/")
            .add_query_param("sessionToken", &token)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("$alice"));
    }

    #[tokio::test]
    async fn test_home_escapes_forged_session_fields() {
        let app = test_app();

        // Forged under a different secret: verify rejects it, but the
        // optimistic decode on the demo page still reads the record
        let forged_record = SessionRecord::new(UserPublicProfile {
            handle: "<script>alert(1)</script>".to_string(),
            display_name: "Mallory".to_string(),
            avatar_url: "x\" onerror=\"alert(2)".to_string(),
        });
        let forged_token = SessionTokenCodec::new("attacker-secret", Duration::hours(1))
            .issue(&forged_record)
            .unwrap();
        assert!(app.codec.verify(&forged_token).is_err());

        let response = app
            .server
            .get("/")
            .add_query_param("sessionToken", &forged_token)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.text();
        assert!(!body.contains("<script>alert(1)</script>"));
        assert!(!body.contains("onerror=\"alert(2)"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[tokio::test]
    async fn test_home_with_garbage_token_falls_back_to_connect_view() {
        let app = test_app();

        let response = app
            .server
            .get("/")
            .add_query_param("sessionToken", "not-a-token")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("authorizeApp"));
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();

        let response = app.server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
    }
}
