//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (search and filters in the query)
//! GET  /products/{id}          - Product detail
//! POST /products/{id}/cart     - Add to cart
//! POST /products/{id}/favorite - Toggle favorite
//! POST /products/{id}/rating   - Create or update the shopper's rating
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/update            - Set a line's quantity
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! GET  /checkout               - Delivery details form
//! POST /checkout               - Place the order (WhatsApp hand-off)
//!
//! # Account (signed-in shoppers)
//! GET  /orders                 - Order history
//! GET  /favorites              - Favorite perfumes
//! GET  /profile                - Profile page
//! POST /profile                - Update name, email, phone
//! POST /profile/password       - Change password
//! POST /profile/delete         - Delete the account
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! GET  /auth/verify            - Email verification page
//! POST /auth/verify            - Submit verification code
//! POST /auth/verify/resend     - Send a new code
//! POST /auth/logout            - Logout action
//! ```
//!
//! Mutating handlers follow Post/Redirect/Get and report their outcome as a
//! flash notification.

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::{Deserialize, Deserializer};

use crate::error::{LOGIN_PATH, Result};
use crate::filters;
use crate::flash::Toast;
use crate::middleware::Shopper;
use crate::state::AppState;
use crate::views::Layout;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/verify", get(auth::verify_page).post(auth::verify))
        .route("/verify/resend", post(auth::resend))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/cart", post(products::add_to_cart))
        .route("/{id}/favorite", post(products::toggle_favorite))
        .route("/{id}/rating", post(products::rate))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile).post(account::update_profile))
        .route("/password", post(account::change_password))
        .route("/delete", post(account::delete_account))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/orders", get(account::orders))
        .route("/favorites", get(account::favorites))
        .nest("/profile", profile_routes())
        .nest("/auth", auth_routes())
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Page shown to anonymous shoppers on pages that need an account.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login_required.html")]
pub struct LoginRequiredTemplate {
    pub layout: Layout,
    pub title: &'static str,
    pub message: &'static str,
}

/// Render the "please log in" page.
pub async fn login_required(
    shopper: &Shopper,
    title: &'static str,
    message: &'static str,
) -> Response {
    LoginRequiredTemplate {
        layout: shopper.layout().await,
        title,
        message,
    }
    .into_response()
}

/// Tell an anonymous shopper to log in, then send them to the login page.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn require_login(shopper: &Shopper, action: &str) -> Result<Response> {
    shopper.notify(Toast::login_required(action)).await?;
    Ok(Redirect::to(LOGIN_PATH).into_response())
}

/// A local path to return to after a form post.
///
/// Anything that is not a same-site absolute path falls back to `default`.
#[must_use]
pub fn return_path(candidate: Option<&str>, default: &str) -> String {
    candidate
        .map(str::trim)
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
        .unwrap_or(default)
        .to_string()
}

/// Read an optional form number, treating a blank or unparsable field as absent.
///
/// Browsers post an emptied number input as `field=`.
///
/// # Errors
///
/// Returns an error only if the field is not a string at all.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}
