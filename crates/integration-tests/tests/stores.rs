//! Auth and cart stores against the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::Method;
use serde_json::json;

use perfume_shop_core::{PerfumeId, UserId};
use perfume_shop_integration_tests::{MockBackend, cart_json, mock_login, user_json};
use perfume_shop_storefront::api::{ApiClient, MemoryTokenStore};
use perfume_shop_storefront::stores::{
    AuthError, AuthPhase, AuthStore, CartError, ShopperMirror,
};

struct Fixture {
    backend: MockBackend,
    api: ApiClient,
    tokens: MemoryTokenStore,
    mirror: ShopperMirror,
}

impl Fixture {
    async fn new() -> Self {
        let backend = MockBackend::start().await;
        let api = ApiClient::new(&backend.config()).unwrap();
        Self {
            backend,
            api,
            tokens: MemoryTokenStore::new(),
            mirror: ShopperMirror::default(),
        }
    }

    fn auth(&self) -> AuthStore<'_, MemoryTokenStore> {
        AuthStore::new(&self.api, &self.tokens, &self.mirror)
    }
}

// ============================================================================
// Auth store
// ============================================================================

#[tokio::test]
async fn test_login_persists_token_and_user() {
    let fx = Fixture::new().await;
    mock_login(&fx.backend);

    let user = fx.auth().login("Leyla@Example.com ", "secret123").await.unwrap();

    assert_eq!(user.name, "Leyla Mammadova");
    assert_eq!(fx.tokens.current().await.as_deref(), Some("token-7"));
    assert!(fx.auth().is_authenticated().await.unwrap());
}

#[tokio::test]
async fn test_unverified_login_stores_no_token() {
    let fx = Fixture::new().await;
    fx.backend.respond(
        Method::POST,
        "/api/auth/login",
        200,
        json!({ "token": "token-7", "user": user_json(7, false) }),
    );

    let err = fx.auth().login("leyla@example.com", "secret123").await.unwrap_err();

    assert!(matches!(err, AuthError::Unverified { ref email } if email == "leyla@example.com"));
    assert!(fx.tokens.current().await.is_none());
    assert!(fx.auth().user().await.is_none());
}

#[tokio::test]
async fn test_failed_login_records_backend_message() {
    let fx = Fixture::new().await;
    fx.backend.respond(
        Method::POST,
        "/api/auth/login",
        401,
        json!({ "message": "Invalid email or password" }),
    );

    let err = fx.auth().login("leyla@example.com", "wrong-pass").await.unwrap_err();

    assert_eq!(err.message_or("Login failed"), "Invalid email or password");
    assert_eq!(
        fx.auth().error().await.as_deref(),
        Some("Invalid email or password")
    );
}

#[tokio::test]
async fn test_invalid_form_never_reaches_backend() {
    let fx = Fixture::new().await;

    let err = fx.auth().login("   ", "secret123").await.unwrap_err();

    assert!(matches!(err, AuthError::Form(_)));
    assert!(fx.backend.requests().is_empty());
}

#[tokio::test]
async fn test_logout_clears_token_and_user() {
    let fx = Fixture::new().await;
    mock_login(&fx.backend);
    fx.auth().login("leyla@example.com", "secret123").await.unwrap();

    fx.backend.respond(Method::GET, "/carts", 200, cart_json(3, 1));

    fx.auth().logout().await.unwrap();

    assert!(fx.tokens.current().await.is_none());
    assert!(fx.auth().user().await.is_none());

    // Nothing authenticated goes out once the shopper has logged out
    assert!(fx.auth().cart().refresh().await.unwrap().is_none());
    assert!(fx.backend.requests_under("/carts").is_empty());
}

#[tokio::test]
async fn test_login_is_authenticating_while_in_flight() {
    let fx = Fixture::new().await;
    fx.backend.respond_after(
        Duration::from_millis(300),
        Method::POST,
        "/api/auth/login",
        200,
        json!({ "token": "token-7", "user": user_json(7, true) }),
    );

    let auth = fx.auth();
    let (result, phase) = tokio::join!(auth.login("leyla@example.com", "secret123"), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        fx.mirror.auth.read().await.phase.clone()
    });

    assert_eq!(phase, AuthPhase::Authenticating);
    assert_eq!(result.unwrap().id, UserId::new(7));
    assert!(matches!(
        fx.mirror.auth.read().await.phase,
        AuthPhase::Authenticated(_)
    ));
}

#[tokio::test]
async fn test_unverified_login_records_error() {
    let fx = Fixture::new().await;
    fx.backend.respond(
        Method::POST,
        "/api/auth/login",
        200,
        json!({ "token": "token-7", "user": user_json(7, false) }),
    );

    fx.auth().login("leyla@example.com", "secret123").await.unwrap_err();

    assert_eq!(fx.mirror.auth.read().await.phase, AuthPhase::Anonymous);
    assert_eq!(
        fx.auth().error().await.as_deref(),
        Some("Please verify your email before logging in. Check your email for verification code.")
    );
}

#[tokio::test]
async fn test_initialize_restores_user_from_token() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/api/auth/me", 200, user_json(7, true));
    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("token-7");
    let mirror = ShopperMirror::default();
    let auth = AuthStore::new(&api, &tokens, &mirror);

    auth.initialize().await.unwrap();

    assert_eq!(auth.user().await.unwrap().email, "leyla@example.com");
}

#[tokio::test]
async fn test_initialize_clears_rejected_token() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/api/auth/me", 401, json!({ "message": "Unauthorized" }));
    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("expired");
    let mirror = ShopperMirror::default();
    let auth = AuthStore::new(&api, &tokens, &mirror);

    auth.initialize().await.unwrap();

    assert!(tokens.current().await.is_none());
    assert!(auth.user().await.is_none());
    assert_eq!(auth.error().await.as_deref(), Some("Failed to authenticate user"));
}

#[tokio::test]
async fn test_initialize_keeps_token_on_server_error() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/api/auth/me", 503, json!({ "message": "Down for maintenance" }));
    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("token-7");
    let mirror = ShopperMirror::default();
    let auth = AuthStore::new(&api, &tokens, &mirror);

    auth.initialize().await.unwrap();

    assert_eq!(tokens.current().await.as_deref(), Some("token-7"));
    assert!(auth.user().await.is_none());
    assert_eq!(auth.error().await.as_deref(), Some("Failed to authenticate user"));
}

#[tokio::test]
async fn test_initialize_keeps_token_on_timeout() {
    let backend = MockBackend::start().await;
    backend.respond_after(
        Duration::from_secs(2),
        Method::GET,
        "/api/auth/me",
        200,
        user_json(7, true),
    );
    let config = backend.config().with_timeout(Duration::from_millis(200));
    let api = ApiClient::new(&config).unwrap();
    let tokens = MemoryTokenStore::with_token("token-7");
    let mirror = ShopperMirror::default();
    let auth = AuthStore::new(&api, &tokens, &mirror);

    auth.initialize().await.unwrap();

    assert_eq!(tokens.current().await.as_deref(), Some("token-7"));
    assert!(auth.user().await.is_none());
}

#[tokio::test]
async fn test_register_sends_normalized_account() {
    let fx = Fixture::new().await;
    fx.backend
        .respond(Method::POST, "/api/auth/register", 200, json!({ "message": "ok" }));

    let email = fx
        .auth()
        .register(
            "Leyla Mammadova",
            " Leyla@Example.com ",
            "+994501234567",
            "secret123",
            "secret123",
        )
        .await
        .unwrap();

    assert_eq!(email, "leyla@example.com");
    let body = fx.backend.requests_to("/api/auth/register")[0].json();
    assert_eq!(body["email"], "leyla@example.com");
    assert_eq!(body["phoneNumber"], "+994501234567");
    assert!(fx.tokens.current().await.is_none());
}

// ============================================================================
// Cart store
// ============================================================================

#[tokio::test]
async fn test_cart_mutation_replaces_mirror() {
    let fx = Fixture::new().await;
    mock_login(&fx.backend);
    fx.auth().login("leyla@example.com", "secret123").await.unwrap();
    fx.backend.respond(Method::POST, "/carts/add", 200, cart_json(3, 2));

    let cart = fx.auth().cart().add(PerfumeId::new(3), 2).await.unwrap();

    assert_eq!(cart.total_items, 2);
    assert_eq!(fx.auth().cart().current().await, Some(cart));
}

#[tokio::test]
async fn test_cart_update_uses_query_parameters() {
    let fx = Fixture::new().await;
    mock_login(&fx.backend);
    fx.auth().login("leyla@example.com", "secret123").await.unwrap();
    fx.backend.respond(Method::PUT, "/carts/update", 200, cart_json(3, 4));

    fx.auth().cart().update(PerfumeId::new(3), 4).await.unwrap();

    let request = &fx.backend.requests_to("/carts/update")[0];
    assert_eq!(request.query.as_deref(), Some("perfumeId=3&quantity=4"));
}

#[tokio::test]
async fn test_cart_requires_token() {
    let fx = Fixture::new().await;

    let err = fx.auth().cart().add(PerfumeId::new(3), 1).await.unwrap_err();

    assert!(matches!(err, CartError::NotAuthenticated));
    assert!(fx.backend.requests().is_empty());
}

#[tokio::test]
async fn test_cart_refresh_failure_drops_mirror() {
    let fx = Fixture::new().await;
    mock_login(&fx.backend);
    fx.auth().login("leyla@example.com", "secret123").await.unwrap();
    fx.backend.respond(Method::GET, "/carts", 200, cart_json(3, 1));
    assert!(fx.auth().cart().refresh().await.unwrap().is_some());

    fx.backend.respond(Method::GET, "/carts", 500, json!({ "message": "boom" }));
    let refreshed = fx.auth().cart().refresh().await.unwrap();

    assert!(refreshed.is_none());
    assert!(fx.auth().cart().current().await.is_none());
    assert!(fx.auth().cart().error().await.is_some());
}
