//! Profile management: details, password, account deletion.

use tracing::{info, instrument, warn};

use perfume_shop_core::validation;

use super::settle;
use crate::api::{ApiError, TokenStore};
use crate::flash::Toast;
use crate::models::ProfileUpdate;
use crate::stores::AuthStore;

/// Update name, email and phone number, then re-fetch the user.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip_all)]
pub async fn update<S: TokenStore>(
    auth: &AuthStore<'_, S>,
    name: &str,
    email: &str,
    phone_number: &str,
) -> Result<Toast, ApiError> {
    let update = ProfileUpdate {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        phone_number: phone_number.trim().to_string(),
    };

    let result = auth.backend().update_profile(&update).await;
    let updated = result.is_ok();
    let toast = settle(
        result,
        |()| Toast::success("Profile updated", "Your profile has been updated successfully"),
        "Update failed",
        "Failed to update profile",
    )?;

    if updated && let Err(e) = auth.refresh_user().await {
        if e.is_session_expired() {
            return Err(ApiError::SessionExpired);
        }
        warn!(error = %e, "Failed to refresh user after profile update");
    }

    Ok(toast)
}

/// Change the password. New and confirmation must match.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip_all)]
pub async fn change_password<S: TokenStore>(
    auth: &AuthStore<'_, S>,
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<Toast, ApiError> {
    let change = match validation::password_change(current, new, confirm) {
        Ok(change) => change,
        Err(e) => return Ok(Toast::error(e.title(), e.to_string())),
    };

    settle(
        auth.backend().change_password(&change).await,
        |()| Toast::success("Password updated", "Your password has been updated successfully"),
        "Password update failed",
        "Failed to update password",
    )
}

/// Delete the account and sign out.
///
/// Returns whether the account was deleted, with the toast to show.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip_all)]
pub async fn delete_account<S: TokenStore>(
    auth: &AuthStore<'_, S>,
) -> Result<(bool, Toast), ApiError> {
    let result = auth.backend().delete_account().await;
    let deleted = result.is_ok();
    let toast = settle(
        result,
        |()| Toast::success("Account deleted", "Your account has been deleted successfully"),
        "Delete failed",
        "Failed to delete account",
    )?;

    if deleted {
        info!("Account deleted");
        if let Err(e) = auth.logout().await {
            warn!(error = %e, "Failed to sign out after account deletion");
        }
    }

    Ok((deleted, toast))
}
