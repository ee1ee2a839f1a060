//! Auth store: who the shopper is.
//!
//! The persisted session token is the single source of truth. The mirrored
//! [`AuthPhase`] is rebuilt from it by [`AuthStore::initialize`] whenever the
//! two disagree.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, instrument, warn};

use perfume_shop_core::FormError;
use perfume_shop_core::validation;

use super::{AuthPhase, ShopperMirror};
use super::cart::CartStore;
use crate::api::{ApiClient, ApiError, Backend, SessionToken, TokenStore, TokenStoreError};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::User;

/// Errors from auth store operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The form failed client-side validation.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The backend issued a token for an account whose email is unconfirmed.
    #[error("Please verify your email before logging in. Check your email for verification code.")]
    Unverified {
        /// Address the verification code was sent to.
        email: String,
    },

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The operation needs a signed-in shopper.
    #[error("Authentication required")]
    NotAuthenticated,

    /// The persisted token could not be read or written.
    #[error(transparent)]
    Token(#[from] TokenStoreError),
}

impl AuthError {
    /// Message to show the shopper, with `fallback` for opaque failures.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.message_or(fallback),
            Self::Token(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the session token was rejected by the backend.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::Api(ApiError::SessionExpired))
    }
}

/// Authentication operations for one shopper.
pub struct AuthStore<'a, S> {
    api: &'a ApiClient,
    tokens: &'a S,
    mirror: &'a ShopperMirror,
}

impl<'a, S: TokenStore> AuthStore<'a, S> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, tokens: &'a S, mirror: &'a ShopperMirror) -> Self {
        Self {
            api,
            tokens,
            mirror,
        }
    }

    /// Backend calls on behalf of this shopper.
    #[must_use]
    pub const fn backend(&self) -> Backend<'a, S> {
        self.api.with_tokens(self.tokens)
    }

    /// The cart store that depends on this auth state.
    #[must_use]
    pub const fn cart(&self) -> CartStore<'a, S> {
        CartStore::new(self.api, self.tokens, self.mirror)
    }

    /// Reconcile the mirrored user with the persisted token.
    ///
    /// - no token: the mirror falls back to anonymous
    /// - token and a known user: nothing to do
    /// - token and no user: fetch `/api/auth/me`. A 401 clears the token;
    ///   any other failure leaves it for the next request to retry.
    ///
    /// # Errors
    ///
    /// Returns an error only if the token store fails.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), AuthError> {
        let token = self.tokens.load().await?;
        let phase = self.mirror.auth.read().await.phase.clone();

        match (token, phase) {
            (None, AuthPhase::Anonymous) | (Some(_), AuthPhase::Authenticated(_)) => Ok(()),
            (None, _) => {
                info!("Session token gone, resetting mirrored user");
                self.set_anonymous(None).await;
                Ok(())
            }
            (Some(_), _) => {
                self.mirror.auth.write().await.phase = AuthPhase::Authenticating;

                match self.backend().current_user().await {
                    Ok(user) => {
                        self.set_authenticated(user).await;
                        Ok(())
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to restore session");
                        if e.status() == Some(StatusCode::UNAUTHORIZED) {
                            self.tokens.clear().await?;
                        }
                        self.set_anonymous(Some("Failed to authenticate user".to_string()))
                            .await;
                        Ok(())
                    }
                }
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// The token is persisted only for verified accounts.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unverified`] for an unconfirmed email, or the
    /// validation/backend failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let credentials = validation::login(email, password)?;

        {
            let mut state = self.mirror.auth.write().await;
            state.phase = AuthPhase::Authenticating;
            state.error = None;
        }

        let response = match self.backend().login(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                let error = AuthError::from(e);
                self.set_anonymous(Some(error.message_or("Login failed"))).await;
                return Err(error);
            }
        };

        if !response.user.verified {
            info!(user_id = %response.user.id, "Login refused for unverified account");
            let error = AuthError::Unverified {
                email: response.user.email,
            };
            self.set_anonymous(Some(error.to_string())).await;
            return Err(error);
        }

        self.tokens.store(SessionToken::new(response.token)).await?;
        self.set_authenticated(response.user.clone()).await;
        info!(user_id = %response.user.id, "Shopper logged in");
        Ok(response.user)
    }

    /// Create an account. Does not sign in; the shopper verifies first.
    ///
    /// Returns the normalized email the code was sent to.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend failure.
    #[instrument(skip(self, password, confirm_password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        phone_number: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<String, AuthError> {
        let account =
            validation::registration(name, email, phone_number, password, confirm_password)?;

        if let Err(e) = self.backend().register(&account).await {
            let error = AuthError::from(e);
            self.record_error(error.message_or("Registration failed"))
                .await;
            return Err(error);
        }

        info!(email = %account.email, "Account registered, awaiting verification");
        Ok(account.email.into_inner())
    }

    /// Confirm an email with its one-time code.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend failure.
    #[instrument(skip(self, code))]
    pub async fn verify(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let verification = validation::verification(email, code)?;
        self.backend().verify_email(&verification).await?;
        Ok(())
    }

    /// Send a new verification code.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend failure.
    #[instrument(skip(self))]
    pub async fn resend_verification(&self, email: &str) -> Result<(), AuthError> {
        let email = validation::resend_email(email)?;
        self.backend().resend_verification(&email).await?;
        Ok(())
    }

    /// Sign out. The mirrored cart is left in place; it is only ever shown
    /// to a signed-in shopper and is replaced on their next refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.tokens.clear().await?;
        self.set_anonymous(None).await;
        clear_sentry_user();
        info!("Shopper logged out");
        Ok(())
    }

    /// Re-fetch the signed-in user, e.g. after a profile update.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] without a token, or the
    /// backend failure.
    #[instrument(skip(self))]
    pub async fn refresh_user(&self) -> Result<User, AuthError> {
        if !self.has_token().await? {
            return Err(AuthError::NotAuthenticated);
        }
        let user = self.backend().current_user().await?;
        self.set_authenticated(user.clone()).await;
        Ok(user)
    }

    /// The mirrored signed-in user.
    pub async fn user(&self) -> Option<User> {
        self.mirror.auth.read().await.user().cloned()
    }

    /// Last recorded auth error.
    pub async fn error(&self) -> Option<String> {
        self.mirror.auth.read().await.error.clone()
    }

    /// Whether a token is persisted and a user is mirrored.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store fails.
    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self.has_token().await? && self.user().await.is_some())
    }

    /// Whether a token is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store fails.
    pub async fn has_token(&self) -> Result<bool, AuthError> {
        Ok(self.tokens.load().await?.is_some())
    }

    async fn set_authenticated(&self, user: User) {
        set_sentry_user(&user.id, Some(&user.email));
        let mut state = self.mirror.auth.write().await;
        state.phase = AuthPhase::Authenticated(user);
        state.error = None;
    }

    async fn set_anonymous(&self, error: Option<String>) {
        let mut state = self.mirror.auth.write().await;
        state.phase = AuthPhase::Anonymous;
        state.error = error;
    }

    async fn record_error(&self, message: String) {
        self.mirror.auth.write().await.error = Some(message);
    }
}
