//! Backend call errors.

use reqwest::StatusCode;
use thiserror::Error;

use super::token::TokenStoreError;

/// Errors that can occur when calling the REST backend.
///
/// Transport failures are normalized into shopper-readable messages.
/// Business-rule rejections keep the backend's own message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused or network unreachable.
    #[error("Unable to connect to server. Please check if the backend is running.")]
    ServerUnavailable,

    /// The request exceeded the client timeout.
    #[error("Request timeout. Please try again.")]
    Timeout,

    /// HTTP 401 on a non-auth endpoint. The persisted token has been cleared.
    #[error("Session expired")]
    SessionExpired,

    /// HTTP 403.
    #[error("Access denied")]
    Forbidden {
        /// Message from the response body, if any.
        message: Option<String>,
    },

    /// HTTP 5xx.
    #[error("Server error ({status})")]
    ServerFault {
        /// Response status.
        status: StatusCode,
        /// Message from the response body, if any.
        message: Option<String>,
    },

    /// Any other non-success status, usually a business-rule rejection.
    #[error("Request rejected ({status})")]
    Rejected {
        /// Response status.
        status: StatusCode,
        /// Message from the response body, if any.
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Any other transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The persisted token could not be read or written.
    #[error("Token store error: {0}")]
    Token(#[from] TokenStoreError),
}

impl ApiError {
    /// Classify a transport-level failure.
    #[must_use]
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ServerUnavailable
        } else {
            Self::Http(err)
        }
    }

    /// The backend's own message for this failure, if it sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Forbidden { message }
            | Self::ServerFault { message, .. }
            | Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Message to show the shopper.
    ///
    /// Prefers the backend's message, then the normalized transport message,
    /// then `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        if let Some(message) = self.backend_message() {
            return message.to_string();
        }
        match self {
            Self::ServerUnavailable | Self::Timeout => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            Self::ServerFault { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session token was rejected and cleared.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Whether the backend answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Whether the failure is a storefront-side fault worth reporting.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::ServerFault { .. } | Self::Decode(_) | Self::Http(_) | Self::Token(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_messages_are_normalized() {
        assert_eq!(
            ApiError::ServerUnavailable.message_or("Failed to add to cart"),
            "Unable to connect to server. Please check if the backend is running."
        );
        assert_eq!(
            ApiError::Timeout.message_or("Failed to add to cart"),
            "Request timeout. Please try again."
        );
    }

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = ApiError::Rejected {
            status: StatusCode::CONFLICT,
            message: Some("Email already in use".to_string()),
        };
        assert_eq!(err.message_or("Registration failed"), "Email already in use");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn test_fallback_without_message() {
        let err = ApiError::ServerFault {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.message_or("Failed to load orders"), "Failed to load orders");
        assert!(err.is_server_fault());
        assert_eq!(ApiError::SessionExpired.message_or("x"), "x");
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::Rejected {
            status: StatusCode::NOT_FOUND,
            message: None,
        };
        assert!(err.is_not_found());
        assert!(!ApiError::SessionExpired.is_not_found());
    }
}
