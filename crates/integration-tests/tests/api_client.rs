//! Backend client interceptors against the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::Method;
use serde_json::json;

use perfume_shop_integration_tests::{MockBackend, perfume_json};
use perfume_shop_storefront::api::{ApiClient, ApiError, MemoryTokenStore};
use perfume_shop_storefront::config::BackendConfig;

#[tokio::test]
async fn test_bearer_token_attached_when_present() {
    let backend = MockBackend::start().await;
    backend.respond(
        Method::GET,
        "/api/favorites/my-favorites",
        200,
        json!([perfume_json(1, "Oud Nights")]),
    );

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("abc");
    let favorites = api.with_tokens(&tokens).favorites().await.unwrap();
    assert_eq!(favorites.len(), 1);

    let requests = backend.requests_to("/api/favorites/my-favorites");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/api/perfumes", 200, json!([]));

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::new();
    let perfumes = api
        .with_tokens(&tokens)
        .perfumes(&perfume_shop_core::ListingQuery::All)
        .await
        .unwrap();
    assert!(perfumes.is_empty());

    let requests = backend.requests_to("/api/perfumes");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].authorization.is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_expires_session() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/carts", 401, json!({ "message": "Unauthorized" }));

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("stale");
    let err = api.with_tokens(&tokens).cart().await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert!(tokens.current().await.is_none());
}

#[tokio::test]
async fn test_unauthorized_on_auth_route_keeps_token() {
    let backend = MockBackend::start().await;
    backend.respond(
        Method::GET,
        "/api/auth/me",
        401,
        json!({ "message": "Invalid credentials" }),
    );

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("kept");
    let err = api.with_tokens(&tokens).current_user().await.unwrap_err();

    assert!(!matches!(err, ApiError::SessionExpired));
    assert_eq!(err.message_or("Login failed"), "Invalid credentials");
    assert_eq!(tokens.current().await.as_deref(), Some("kept"));
}

#[tokio::test]
async fn test_business_rejection_keeps_backend_message() {
    let backend = MockBackend::start().await;
    backend.respond(
        Method::POST,
        "/carts/add",
        400,
        json!({ "message": "Not enough stock" }),
    );

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("abc");
    let err = api
        .with_tokens(&tokens)
        .add_to_cart(perfume_shop_core::PerfumeId::new(3), 9)
        .await
        .unwrap_err();

    assert_eq!(err.message_or("Failed to add to cart"), "Not enough stock");
    assert_eq!(
        backend.requests_to("/carts/add")[0].json(),
        json!({ "perfumeId": 3, "quantity": 9 })
    );
}

#[tokio::test]
async fn test_connection_refused_is_server_unavailable() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = url::Url::parse(&format!("http://{addr}")).unwrap();
    let api = ApiClient::new(&BackendConfig::new(url)).unwrap();
    let tokens = MemoryTokenStore::new();
    let err = api.with_tokens(&tokens).brands().await.unwrap_err();

    assert!(matches!(err, ApiError::ServerUnavailable));
    assert_eq!(
        err.to_string(),
        "Unable to connect to server. Please check if the backend is running."
    );
}

#[tokio::test]
async fn test_slow_backend_is_timeout() {
    let backend = MockBackend::start().await;
    backend.respond_after(
        Duration::from_secs(2),
        Method::GET,
        "/api/brands",
        200,
        json!([]),
    );

    let config = backend.config().with_timeout(Duration::from_millis(200));
    let api = ApiClient::new(&config).unwrap();
    let tokens = MemoryTokenStore::new();
    let err = api.with_tokens(&tokens).brands().await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout));
    assert_eq!(err.to_string(), "Request timeout. Please try again.");
}

#[tokio::test]
async fn test_brand_list_is_cached() {
    let backend = MockBackend::start().await;
    backend.respond(
        Method::GET,
        "/api/brands",
        200,
        json!([{ "id": 1, "name": "Maison Test" }]),
    );

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::new();
    let first = api.with_tokens(&tokens).brands().await.unwrap();
    let second = api.with_tokens(&tokens).brands().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.requests_to("/api/brands").len(), 1);
}
