//! Cart store: the shopper's server-side cart.
//!
//! Every mutation is request-then-replace. Responses are ordered by ticket
//! (see [`CartState`](super::CartState)) so the last response wins.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use perfume_shop_core::PerfumeId;

use super::ShopperMirror;
use crate::api::{ApiClient, ApiError, Backend, TokenStore, TokenStoreError};
use crate::models::Cart;

/// Errors from cart store operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Cart mutations need a session token.
    #[error("Authentication required")]
    NotAuthenticated,

    /// The backend call failed. `message` is what the shopper sees.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ApiError,
    },

    /// The persisted token could not be read.
    #[error(transparent)]
    Token(#[from] TokenStoreError),
}

impl CartError {
    /// Whether the session token was rejected by the backend.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Self::Failed {
                source: ApiError::SessionExpired,
                ..
            }
        )
    }
}

/// Cart operations for one shopper.
pub struct CartStore<'a, S> {
    api: &'a ApiClient,
    tokens: &'a S,
    mirror: &'a ShopperMirror,
}

impl<'a, S: TokenStore> CartStore<'a, S> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, tokens: &'a S, mirror: &'a ShopperMirror) -> Self {
        Self {
            api,
            tokens,
            mirror,
        }
    }

    fn backend(&self) -> Backend<'a, S> {
        self.api.with_tokens(self.tokens)
    }

    /// Re-fetch the cart. Skipped unless both a token and a user are present.
    ///
    /// A failure other than session expiry drops the mirrored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store fails or the session expired.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Option<Cart>, CartError> {
        let has_token = self.tokens.load().await?.is_some();
        let has_user = self.mirror.auth.read().await.user().is_some();
        if !(has_token && has_user) {
            debug!("Skipping cart refresh for anonymous shopper");
            return Ok(None);
        }

        let ticket = self.mirror.cart.write().await.begin();
        match self.backend().cart().await {
            Ok(cart) => {
                let mut state = self.mirror.cart.write().await;
                if !state.apply(ticket, Some(cart)) {
                    debug!(ticket, "Discarded stale cart response");
                }
                Ok(state.cart().cloned())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load cart");
                let expired = e.is_session_expired();
                self.mirror
                    .cart
                    .write()
                    .await
                    .fail(ticket, "Failed to load cart".to_string(), !expired);
                if expired {
                    return Err(CartError::Failed {
                        message: e.message_or("Failed to load cart"),
                        source: e,
                    });
                }
                Ok(None)
            }
        }
    }

    /// Add a perfume to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotAuthenticated`] without a token, or the backend
    /// failure with its message.
    #[instrument(skip(self), fields(perfume_id = %perfume_id))]
    pub async fn add(&self, perfume_id: PerfumeId, quantity: u32) -> Result<Cart, CartError> {
        self.require_token().await?;
        let ticket = self.mirror.cart.write().await.begin();
        let result = self.backend().add_to_cart(perfume_id, quantity).await;
        self.settle(ticket, result, "Failed to add to cart").await
    }

    /// Set the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotAuthenticated`] without a token, or the backend
    /// failure with its message.
    #[instrument(skip(self), fields(perfume_id = %perfume_id))]
    pub async fn update(&self, perfume_id: PerfumeId, quantity: u32) -> Result<Cart, CartError> {
        self.require_token().await?;
        let ticket = self.mirror.cart.write().await.begin();
        let result = self.backend().update_cart_item(perfume_id, quantity).await;
        self.settle(ticket, result, "Failed to update cart").await
    }

    /// Remove a perfume from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotAuthenticated`] without a token, or the backend
    /// failure with its message.
    #[instrument(skip(self), fields(perfume_id = %perfume_id))]
    pub async fn remove(&self, perfume_id: PerfumeId) -> Result<Cart, CartError> {
        self.require_token().await?;
        let ticket = self.mirror.cart.write().await.begin();
        let result = self.backend().remove_from_cart(perfume_id).await;
        self.settle(ticket, result, "Failed to remove from cart")
            .await
    }

    /// Empty the cart. The mirror becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotAuthenticated`] without a token, or the backend
    /// failure with its message.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        self.require_token().await?;
        let ticket = self.mirror.cart.write().await.begin();
        match self.backend().clear_cart().await {
            Ok(()) => {
                self.mirror.cart.write().await.apply(ticket, None);
                Ok(())
            }
            Err(e) => Err(self.failed(ticket, e, "Failed to clear cart").await),
        }
    }

    /// Forget the mirrored cart, e.g. after checkout emptied it server-side.
    pub async fn reset(&self) {
        let mut state = self.mirror.cart.write().await;
        let ticket = state.begin();
        state.apply(ticket, None);
    }

    /// The mirrored cart.
    pub async fn current(&self) -> Option<Cart> {
        self.mirror.cart.read().await.cart().cloned()
    }

    /// Last recorded cart error.
    pub async fn error(&self) -> Option<String> {
        self.mirror.cart.read().await.error().map(String::from)
    }

    async fn require_token(&self) -> Result<(), CartError> {
        if self.tokens.load().await?.is_none() {
            return Err(CartError::NotAuthenticated);
        }
        Ok(())
    }

    async fn settle(
        &self,
        ticket: u64,
        result: Result<Cart, ApiError>,
        fallback: &str,
    ) -> Result<Cart, CartError> {
        match result {
            Ok(cart) => {
                if !self.mirror.cart.write().await.apply(ticket, Some(cart.clone())) {
                    debug!(ticket, "Discarded stale cart response");
                }
                Ok(cart)
            }
            Err(e) => Err(self.failed(ticket, e, fallback).await),
        }
    }

    async fn failed(&self, ticket: u64, error: ApiError, fallback: &str) -> CartError {
        let message = error.message_or(fallback);
        warn!(error = %error, message = %message, "Cart mutation failed");
        self.mirror
            .cart
            .write()
            .await
            .fail(ticket, message.clone(), false);
        CartError::Failed {
            message,
            source: error,
        }
    }
}
