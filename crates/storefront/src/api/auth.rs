//! Authentication endpoints.

use reqwest::Method;
use tracing::instrument;

use perfume_shop_core::validation::{Credentials, NewAccount, Verification};

use super::{ApiError, Backend, TokenStore};
use crate::models::{AuthResponse, User};

impl<S: TokenStore> Backend<'_, S> {
    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or is unreachable.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.post("/api/auth/login", credentials).await
    }

    /// Create an account. The backend emails a verification code.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the account or is unreachable.
    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn register(&self, account: &NewAccount) -> Result<(), ApiError> {
        self.exec(
            Method::POST,
            "/api/auth/register",
            &[],
            Some(serde_json::to_value(account)?),
        )
        .await
    }

    /// Confirm an email address with its verification code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is rejected or the backend is unreachable.
    #[instrument(skip(self, verification), fields(email = %verification.email))]
    pub async fn verify_email(&self, verification: &Verification) -> Result<(), ApiError> {
        self.exec(
            Method::POST,
            "/api/auth/verify",
            &[],
            Some(serde_json::to_value(verification)?),
        )
        .await
    }

    /// Ask the backend to send a fresh verification code.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses or is unreachable.
    #[instrument(skip(self))]
    pub async fn resend_verification(&self, email: &str) -> Result<(), ApiError> {
        self.exec(
            Method::POST,
            "/api/auth/resend-verification",
            &[("email", email.to_string())],
            None,
        )
        .await
    }

    /// Fetch the account the current token belongs to.
    ///
    /// This is an auth route: a 401 is returned as a rejection and the
    /// token is left for the caller to deal with.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the backend is unreachable.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/api/auth/me", &[]).await
    }
}
