//! Account management endpoints.

use reqwest::Method;
use tracing::instrument;

use perfume_shop_core::validation::PasswordChange;

use super::{ApiError, Backend, TokenStore};
use crate::models::ProfileUpdate;

impl<S: TokenStore> Backend<'_, S> {
    /// Update name, email and phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.exec(
            Method::PUT,
            "/api/users/profile",
            &[],
            Some(serde_json::to_value(update)?),
        )
        .await
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change (e.g. wrong current password).
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.exec(
            Method::PUT,
            "/api/users/password",
            &[],
            Some(serde_json::to_value(change)?),
        )
        .await
    }

    /// Delete the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> Result<(), ApiError> {
        self.exec(Method::DELETE, "/api/users/profile", &[], None).await
    }
}
