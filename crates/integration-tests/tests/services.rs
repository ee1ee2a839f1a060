//! Page services against the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::Method;
use serde_json::json;

use perfume_shop_core::{ListingParams, PerfumeId};
use perfume_shop_integration_tests::{MockBackend, perfume_json};
use perfume_shop_storefront::api::{ApiClient, MemoryTokenStore};
use perfume_shop_storefront::flash::ToastKind;
use perfume_shop_storefront::services::{catalog, ratings};

fn mock_lookups(backend: &MockBackend) {
    backend.respond(Method::GET, "/api/brands", 200, json!([{ "id": 3, "name": "Maison Test" }]));
    backend.respond(Method::GET, "/api/categories", 200, json!([{ "id": 2, "name": "Oriental" }]));
}

#[tokio::test]
async fn test_listing_makes_one_query_by_precedence() {
    let backend = MockBackend::start().await;
    mock_lookups(&backend);
    backend.respond(
        Method::GET,
        "/api/perfumes/category/2",
        200,
        json!([perfume_json(1, "Oud Nights")]),
    );

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::new();
    let params = ListingParams {
        category: Some("2".to_string()),
        brand: Some("3".to_string()),
        featured: Some("true".to_string()),
        ..ListingParams::default()
    };

    let listing = catalog::listing(&api.with_tokens(&tokens), &params).await.unwrap();

    assert_eq!(listing.perfumes.len(), 1);
    assert!(listing.error.is_none());
    let perfume_requests = backend.requests_under("/api/perfumes");
    assert_eq!(perfume_requests.len(), 1);
    assert_eq!(perfume_requests[0].path, "/api/perfumes/category/2");
}

#[tokio::test]
async fn test_listing_search_wins_over_everything() {
    let backend = MockBackend::start().await;
    mock_lookups(&backend);
    backend.respond(Method::GET, "/api/perfumes/search", 200, json!([]));

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::new();
    let params = ListingParams {
        search: Some("rose".to_string()),
        category: Some("2".to_string()),
        ..ListingParams::default()
    };

    catalog::listing(&api.with_tokens(&tokens), &params).await.unwrap();

    let perfume_requests = backend.requests_under("/api/perfumes");
    assert_eq!(perfume_requests.len(), 1);
    assert_eq!(perfume_requests[0].path, "/api/perfumes/search");
    assert_eq!(perfume_requests[0].query.as_deref(), Some("name=rose"));
}

#[tokio::test]
async fn test_listing_failure_keeps_page() {
    let backend = MockBackend::start().await;
    mock_lookups(&backend);
    backend.respond(Method::GET, "/api/perfumes", 500, json!({ "message": "db down" }));

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::new();
    let listing = catalog::listing(&api.with_tokens(&tokens), &ListingParams::default())
        .await
        .unwrap();

    assert!(listing.perfumes.is_empty());
    assert_eq!(listing.error.as_deref(), Some("db down"));
    assert_eq!(listing.brands.len(), 1);
}

#[tokio::test]
async fn test_rating_posts_when_none_exists() {
    let backend = MockBackend::start().await;
    backend.respond(Method::POST, "/api/ratings/perfume/5", 200, json!({}));

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("abc");
    let toast = ratings::submit(&api.with_tokens(&tokens), PerfumeId::new(5), Some(4), " Lovely ")
        .await
        .unwrap();

    assert_eq!(toast.kind, ToastKind::Success);
    let writes: Vec<_> = backend
        .requests_to("/api/ratings/perfume/5")
        .into_iter()
        .filter(|request| request.method != Method::GET)
        .collect();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, Method::POST);
    assert_eq!(writes[0].json(), json!({ "rating": 4, "comment": "Lovely" }));
}

#[tokio::test]
async fn test_rating_puts_when_one_exists() {
    let backend = MockBackend::start().await;
    backend.respond(
        Method::GET,
        "/api/ratings/perfume/5/my-rating",
        200,
        json!({ "id": 9, "rating": 2, "comment": "meh" }),
    );
    backend.respond(Method::PUT, "/api/ratings/perfume/5", 200, json!({}));

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("abc");
    ratings::submit(&api.with_tokens(&tokens), PerfumeId::new(5), Some(5), "")
        .await
        .unwrap();

    assert!(
        backend
            .requests_to("/api/ratings/perfume/5")
            .iter()
            .all(|request| request.method != Method::POST)
    );
    assert_eq!(
        backend
            .requests_to("/api/ratings/perfume/5")
            .iter()
            .filter(|request| request.method == Method::PUT)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_rating_without_stars_is_rejected_locally() {
    let backend = MockBackend::start().await;

    let api = ApiClient::new(&backend.config()).unwrap();
    let tokens = MemoryTokenStore::with_token("abc");
    let toast = ratings::submit(&api.with_tokens(&tokens), PerfumeId::new(5), None, "nice")
        .await
        .unwrap();

    assert_eq!(toast.kind, ToastKind::Error);
    assert!(backend.requests().is_empty());
}
