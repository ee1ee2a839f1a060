//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! An expired backend session is not an error page: it becomes a redirect to
//! the login page. The login page itself never triggers one, so there is no
//! redirect loop.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::api::{ApiError, TokenStoreError};
use crate::stores::{AuthError, CartError};

/// Where an expired session is sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenStoreError> for AppError {
    fn from(err: TokenStoreError) -> Self {
        Self::Api(ApiError::Token(err))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Api(e) => Self::Api(e),
            AuthError::Token(e) => e.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Failed { source, .. } => Self::Api(source),
            CartError::Token(e) => e.into(),
            CartError::NotAuthenticated => Self::Api(ApiError::SessionExpired),
        }
    }
}

impl AppError {
    /// Whether this error should be reported to Sentry.
    const fn is_reportable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_server_fault(),
            Self::Session(_) | Self::Internal(_) => true,
            Self::NotFound(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Api(ApiError::ServerUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Api(ApiError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Api(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Api(ApiError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            Self::Api(ApiError::Rejected { .. }) => StatusCode::BAD_REQUEST,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Api(ApiError::SessionExpired)) {
            tracing::info!("Session expired, redirecting to login");
            return Redirect::to(LOGIN_PATH).into_response();
        }

        // Capture server errors to Sentry
        if self.is_reportable() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Api(e) if e.is_not_found() => "Not found".to_string(),
            Self::Api(e) => e.message_or("Something went wrong. Please try again."),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("perfume_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
