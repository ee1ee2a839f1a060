//! Integration test harness for the PerfumeShop storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p perfume-shop-integration-tests
//! ```
//!
//! No external services are needed: [`MockBackend`] stands in for the REST
//! backend on an ephemeral local port, and [`TestStorefront`] serves the real
//! router against it.
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::start().await;
//! backend.respond(Method::GET, "/api/brands", 200, json!([]));
//!
//! let storefront = TestStorefront::start(&backend).await;
//! let resp = storefront.client.get(storefront.url("/")).send().await?;
//! assert_eq!(resp.status(), 200);
//! ```

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use url::Url;

use perfume_shop_storefront::config::{BackendConfig, StorefrontConfig};
use perfume_shop_storefront::state::AppState;

// =============================================================================
// MockBackend
// =============================================================================

/// A request the mock backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The request body parsed as JSON (`Null` when empty).
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    body: Option<Value>,
    delay: Option<Duration>,
}

impl Canned {
    fn new(status: u16, body: Option<Value>) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            body,
            delay: None,
        }
    }
}

#[derive(Default)]
struct MockState {
    responses: Mutex<HashMap<(Method, String), Canned>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the PerfumeShop REST backend.
///
/// Responses are keyed by method and exact path; anything unregistered gets
/// a 404 with a JSON `message`.
#[derive(Clone)]
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self { addr, state }
    }

    /// Base URL of the mock.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("mock backend url")
    }

    /// Backend settings pointing at the mock.
    #[must_use]
    pub fn config(&self) -> BackendConfig {
        BackendConfig::new(self.url())
    }

    /// Register a JSON response.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.insert(method, path, Canned::new(status, Some(body)));
    }

    /// Register a response with an empty body.
    pub fn respond_empty(&self, method: Method, path: &str, status: u16) {
        self.insert(method, path, Canned::new(status, None));
    }

    /// Register a JSON response sent only after `delay`.
    pub fn respond_after(
        &self,
        delay: Duration,
        method: Method,
        path: &str,
        status: u16,
        body: Value,
    ) {
        let mut canned = Canned::new(status, Some(body));
        canned.delay = Some(delay);
        self.insert(method, path, canned);
    }

    fn insert(&self, method: Method, path: &str, canned: Canned) {
        self.state
            .responses
            .lock()
            .expect("responses lock")
            .insert((method, path.to_string()), canned);
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }

    /// Requests received for one path.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    /// Requests received for paths starting with `prefix`.
    #[must_use]
    pub fn requests_under(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path.starts_with(prefix))
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(String::from),
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(String::from),
            body: String::from_utf8_lossy(&body).into_owned(),
        });

    let canned = state
        .responses
        .lock()
        .expect("responses lock")
        .get(&(method, path))
        .cloned();

    if let Some(delay) = canned.as_ref().and_then(|canned| canned.delay) {
        tokio::time::sleep(delay).await;
    }

    match canned {
        Some(Canned {
            status,
            body: Some(body),
            ..
        }) => (status, axum::Json(body)).into_response(),
        Some(Canned {
            status, body: None, ..
        }) => status.into_response(),
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "message": "not mocked" })),
        )
            .into_response(),
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A backend user.
#[must_use]
pub fn user_json(id: u64, verified: bool) -> Value {
    json!({
        "id": id,
        "name": "Leyla Mammadova",
        "email": "leyla@example.com",
        "phoneNumber": "+994501234567",
        "role": "USER",
        "verified": verified,
    })
}

/// A backend perfume.
#[must_use]
pub fn perfume_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": 120.0,
        "stockQuantity": 5,
        "brand": { "id": 1, "name": "Maison Test" },
        "averageRating": 4.5,
        "ratingCount": 2,
    })
}

/// A backend cart holding `quantity` of one perfume.
#[must_use]
pub fn cart_json(perfume_id: u64, quantity: u32) -> Value {
    json!({
        "id": 1,
        "items": [{
            "id": 10,
            "perfume": perfume_json(perfume_id, "Oud Nights"),
            "quantity": quantity,
            "subtotal": 120.0 * f64::from(quantity),
        }],
        "totalItems": quantity,
        "totalPrice": 120.0 * f64::from(quantity),
    })
}

// =============================================================================
// TestStorefront
// =============================================================================

/// The storefront router served on an ephemeral port.
pub struct TestStorefront {
    pub addr: SocketAddr,
    /// Keeps cookies, never follows redirects.
    pub client: reqwest::Client,
}

impl TestStorefront {
    /// Serve the storefront against `backend`.
    pub async fn start(backend: &MockBackend) -> Self {
        let api_url = backend.url().to_string();
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "PERFUME_API_URL").then(|| api_url.clone())
        })
        .expect("storefront config");
        let state = AppState::new(config).expect("storefront state");
        let app = perfume_shop_storefront::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront");
        let addr = listener.local_addr().expect("storefront address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("storefront");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("http client");

        Self { addr, client }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Log in through the login form.
    pub async fn login(&self) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .form(&[("email", "leyla@example.com"), ("password", "secret123")])
            .send()
            .await
            .expect("login request")
    }
}

/// Register the backend responses for a successful login of user 7.
pub fn mock_login(backend: &MockBackend) {
    backend.respond(
        Method::POST,
        "/api/auth/login",
        200,
        json!({ "token": "token-7", "user": user_json(7, true) }),
    );
    backend.respond(Method::GET, "/api/auth/me", 200, user_json(7, true));
}
