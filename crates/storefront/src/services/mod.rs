//! Page services: the backend conversations behind each page.
//!
//! Services take a shopper's [`AuthStore`](crate::stores::AuthStore) (or a
//! [`Backend`](crate::api::Backend)) so they run the same against the session
//! token store in production and the memory store in tests.
//!
//! Shopper-facing failures come back as error [`Toast`]s. Only an expired
//! session escapes as `Err`, so the handler can redirect to the login page.

pub mod catalog;
pub mod checkout;
pub mod favorites;
pub mod profile;
pub mod ratings;

use crate::api::ApiError;
use crate::flash::Toast;

/// Turn a backend result into a notification.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] unchanged.
pub(crate) fn settle<T>(
    result: Result<T, ApiError>,
    success: impl FnOnce(T) -> Toast,
    error_title: &str,
    fallback: &str,
) -> Result<Toast, ApiError> {
    match result {
        Ok(value) => Ok(success(value)),
        Err(ApiError::SessionExpired) => Err(ApiError::SessionExpired),
        Err(e) => {
            tracing::warn!(error = %e, "{error_title}");
            Ok(Toast::error(error_title, e.message_or(fallback)))
        }
    }
}

/// Keep the value of a non-essential call, logging and dropping failures
/// other than an expired session.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] unchanged.
pub(crate) fn or_default<T: Default>(result: Result<T, ApiError>, what: &str) -> Result<T, ApiError> {
    match result {
        Ok(value) => Ok(value),
        Err(ApiError::SessionExpired) => Err(ApiError::SessionExpired),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch {what}");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::flash::ToastKind;

    #[test]
    fn test_settle_uses_backend_message() {
        let toast = settle::<()>(
            Err(ApiError::Rejected {
                status: StatusCode::BAD_REQUEST,
                message: Some("Insufficient stock".into()),
            }),
            |()| Toast::success("ok", "ok"),
            "Error",
            "Failed to add item to cart",
        )
        .unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Insufficient stock");
    }

    #[test]
    fn test_settle_escalates_expired_session() {
        let result = settle::<()>(Err(ApiError::SessionExpired), |()| Toast::success("", ""), "Error", "");
        assert!(matches!(result, Err(ApiError::SessionExpired)));
    }

    #[test]
    fn test_or_default_swallows_other_failures() {
        let brands: Vec<u32> = or_default(Err(ApiError::Timeout), "brands").unwrap();
        assert!(brands.is_empty());
        assert!(or_default::<Vec<u32>>(Err(ApiError::SessionExpired), "brands").is_err());
    }
}
