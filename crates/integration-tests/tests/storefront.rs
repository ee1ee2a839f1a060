//! The full storefront router against the mock backend.

#![allow(clippy::unwrap_used)]

use axum::http::Method;
use reqwest::StatusCode;
use reqwest::header::{LOCATION, SET_COOKIE};
use serde_json::json;

use perfume_shop_integration_tests::{
    MockBackend, TestStorefront, cart_json, mock_login, perfume_json, user_json,
};

fn location(response: &reqwest::Response) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

fn mock_catalog(backend: &MockBackend) {
    backend.respond(Method::GET, "/api/brands", 200, json!([]));
    backend.respond(Method::GET, "/api/categories", 200, json!([]));
    backend.respond(
        Method::GET,
        "/api/perfumes/featured",
        200,
        json!([perfume_json(1, "Oud Nights")]),
    );
    backend.respond(Method::GET, "/api/perfumes/bestsellers", 200, json!([]));
    backend.respond(Method::GET, "/api/perfumes", 200, json!([perfume_json(1, "Oud Nights")]));
}

#[tokio::test]
async fn test_health() {
    let backend = MockBackend::start().await;
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront.client.get(storefront.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_pages_carry_request_id_and_security_headers() {
    let backend = MockBackend::start().await;
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront
        .client
        .get(storefront.url("/auth/login"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers().get(SET_COOKIE).is_some());
}

#[tokio::test]
async fn test_home_renders_featured_perfumes() {
    let backend = MockBackend::start().await;
    mock_catalog(&backend);
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront.client.get(storefront.url("/")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Oud Nights"));
    assert!(body.contains("Login"));
}

#[tokio::test]
async fn test_anonymous_add_to_cart_redirects_to_login() {
    let backend = MockBackend::start().await;
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront
        .client
        .post(storefront.url("/products/1/cart"))
        .form(&[("name", "Oud Nights"), ("return_to", "/products")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
    assert!(backend.requests_under("/carts").is_empty());

    let login = storefront
        .client
        .get(storefront.url("/auth/login"))
        .send()
        .await
        .unwrap();
    let body = login.text().await.unwrap();
    assert!(body.contains("Please login to add items to cart"));
}

#[tokio::test]
async fn test_login_then_add_to_cart() {
    let backend = MockBackend::start().await;
    mock_login(&backend);
    backend.respond(Method::GET, "/carts", 200, cart_json(1, 1));
    backend.respond(Method::POST, "/carts/add", 200, cart_json(1, 2));
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront.login().await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = storefront
        .client
        .post(storefront.url("/products/1/cart"))
        .form(&[("name", "Oud Nights"), ("quantity", "1"), ("return_to", "/cart")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let add = backend.requests_to("/carts/add");
    assert_eq!(add.len(), 1);
    assert_eq!(add.first().unwrap().authorization.as_deref(), Some("Bearer token-7"));

    let cart = storefront.client.get(storefront.url("/cart")).send().await.unwrap();
    let body = cart.text().await.unwrap();
    assert!(body.contains("Oud Nights has been added to your cart"));
    assert!(body.contains("Proceed to checkout"));
}

#[tokio::test]
async fn test_unverified_login_goes_to_verification() {
    let backend = MockBackend::start().await;
    backend.respond(
        Method::POST,
        "/api/auth/login",
        200,
        json!({ "token": "token-7", "user": user_json(7, false) }),
    );
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront.login().await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/verify?email=leyla%40example.com");
    assert!(backend.requests_to("/api/auth/me").is_empty());
}

#[tokio::test]
async fn test_expired_session_redirects_to_login() {
    let backend = MockBackend::start().await;
    mock_login(&backend);
    backend.respond(Method::GET, "/carts", 200, cart_json(1, 1));
    let storefront = TestStorefront::start(&backend).await;
    storefront.login().await;

    backend.respond(Method::GET, "/carts", 401, json!({ "message": "Unauthorized" }));
    let response = storefront.client.get(storefront.url("/cart")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");

    // The token is gone, so the login page renders without touching the cart
    let response = storefront
        .client
        .get(storefront.url("/auth/login"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_orders_page_asks_anonymous_shopper_to_login() {
    let backend = MockBackend::start().await;
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront.client.get(storefront.url("/orders")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Sign in to view your orders"));
    assert!(backend.requests_under("/api/orders").is_empty());
}

#[tokio::test]
async fn test_unknown_perfume_is_not_found() {
    let backend = MockBackend::start().await;
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront
        .client
        .get(storefront.url("/products/404"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_shows_unrated_perfume() {
    let backend = MockBackend::start().await;
    mock_catalog(&backend);
    backend.respond(
        Method::GET,
        "/api/perfumes",
        200,
        json!([{
            "id": 1,
            "name": "Unrated Oud",
            "price": 50.0,
            "averageRating": null,
            "ratingCount": null
        }]),
    );
    let storefront = TestStorefront::start(&backend).await;

    let response = storefront.client.get(storefront.url("/products")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Unrated Oud"));
}

#[tokio::test]
async fn test_blank_quantity_adds_one() {
    let backend = MockBackend::start().await;
    mock_login(&backend);
    backend.respond(Method::GET, "/carts", 200, cart_json(1, 1));
    backend.respond(Method::POST, "/carts/add", 200, cart_json(1, 1));
    let storefront = TestStorefront::start(&backend).await;
    storefront.login().await;

    let response = storefront
        .client
        .post(storefront.url("/products/1/cart"))
        .form(&[("name", "Oud Nights"), ("quantity", ""), ("return_to", "/products/1")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products/1");
    let add = backend.requests_to("/carts/add");
    assert_eq!(add.len(), 1);
    assert_eq!(add.first().unwrap().json()["quantity"], 1);
}

#[tokio::test]
async fn test_anonymous_profile_actions_never_reach_backend() {
    let backend = MockBackend::start().await;
    let storefront = TestStorefront::start(&backend).await;

    for (path, form) in [
        ("/profile", vec![("name", "Leyla"), ("email", "leyla@example.com")]),
        (
            "/profile/password",
            vec![
                ("current_password", "secret123"),
                ("new_password", "secret456"),
                ("confirm_password", "secret456"),
            ],
        ),
        ("/profile/delete", vec![("confirm", "yes")]),
    ] {
        let response = storefront
            .client
            .post(storefront.url(path))
            .form(&form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/login");
    }

    assert!(backend.requests_under("/api/users").is_empty());
}
