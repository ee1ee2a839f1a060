//! Per-shopper mirrors of server-authoritative state.
//!
//! Each browser session owns one [`ShopperMirror`] holding what the storefront
//! last learned from the backend: who the shopper is and what is in their
//! cart. Handlers never edit the mirror field-by-field for persistence; every
//! mutation goes to the backend and the response replaces the mirrored copy.
//!
//! [`AuthStore`] and [`CartStore`] are cheap, borrow-only views built per
//! request from the shared [`ApiClient`](crate::api::ApiClient), the
//! shopper's [`TokenStore`](crate::api::TokenStore) and their mirror.
//!
//! Locks are never held across a backend call.

pub mod auth;
pub mod cart;

pub use auth::{AuthError, AuthStore};
pub use cart::{CartError, CartStore};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Cart, User};

/// Mirrors are dropped after a week without requests, like the session cookie.
const MIRROR_IDLE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Where the shopper is in the sign-in lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated(User),
}

/// Mirrored authentication state.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub error: Option<String>,
}

impl AuthState {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match &self.phase {
            AuthPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Mirrored cart state with response ordering.
///
/// Every cart request takes a ticket from [`CartState::begin`]. A response is
/// applied only when its ticket is newer than the last applied one, so a slow
/// response can never overwrite a fresher cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Option<Cart>,
    issued: u64,
    applied: u64,
    in_flight: u32,
    error: Option<String>,
}

impl CartState {
    /// Start a request and return its ticket.
    pub const fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.in_flight += 1;
        self.issued
    }

    /// Apply a response. Returns `false` if it was stale and discarded.
    pub fn apply(&mut self, ticket: u64, cart: Option<Cart>) -> bool {
        self.finish();
        if ticket <= self.applied {
            return false;
        }
        self.applied = ticket;
        self.cart = cart;
        self.error = None;
        true
    }

    /// Record a failed request.
    ///
    /// With `reset` the cart is dropped too, subject to the same ordering as
    /// [`CartState::apply`]. Returns `false` if the failure was stale.
    pub fn fail(&mut self, ticket: u64, message: String, reset: bool) -> bool {
        self.finish();
        if reset {
            if ticket <= self.applied {
                return false;
            }
            self.applied = ticket;
            self.cart = None;
        }
        self.error = Some(message);
        true
    }

    const fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Units across all lines, zero when no cart is mirrored.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.cart.as_ref().map_or(0, |cart| cart.total_items)
    }
}

/// Everything the storefront mirrors for one shopper.
#[derive(Debug, Default)]
pub struct ShopperMirror {
    pub auth: RwLock<AuthState>,
    pub cart: RwLock<CartState>,
}

/// All live shopper mirrors, keyed by the id stored in each session.
#[derive(Clone)]
pub struct ShopperMirrors {
    cache: Cache<Uuid, Arc<ShopperMirror>>,
}

impl ShopperMirrors {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().time_to_idle(MIRROR_IDLE).build(),
        }
    }

    /// The mirror for `shopper`, created empty on first use.
    pub async fn get(&self, shopper: Uuid) -> Arc<ShopperMirror> {
        self.cache
            .get_with(shopper, async { Arc::new(ShopperMirror::default()) })
            .await
    }
}

impl Default for ShopperMirrors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use perfume_shop_core::{CartId, Price};

    use super::*;

    fn cart(id: i64, total_items: u32) -> Cart {
        Cart {
            id: CartId::new(id),
            items: Vec::new(),
            total_items,
            total_price: Price::default(),
        }
    }

    #[test]
    fn test_responses_apply_in_order() {
        let mut state = CartState::default();
        let first = state.begin();
        assert!(state.is_loading());
        assert!(state.apply(first, Some(cart(1, 2))));
        assert!(!state.is_loading());
        assert_eq!(state.total_items(), 2);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = CartState::default();
        let slow = state.begin();
        let fast = state.begin();

        assert!(state.apply(fast, Some(cart(1, 5))));
        assert!(!state.apply(slow, Some(cart(1, 1))));

        assert_eq!(state.total_items(), 5);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_reset_failure_drops_cart() {
        let mut state = CartState::default();
        let ticket = state.begin();
        state.apply(ticket, Some(cart(1, 3)));

        let ticket = state.begin();
        assert!(state.fail(ticket, "Failed to load cart".into(), true));
        assert!(state.cart().is_none());
        assert_eq!(state.error(), Some("Failed to load cart"));
    }

    #[test]
    fn test_mutation_failure_keeps_cart() {
        let mut state = CartState::default();
        let ticket = state.begin();
        state.apply(ticket, Some(cart(1, 3)));

        let ticket = state.begin();
        state.fail(ticket, "Out of stock".into(), false);
        assert_eq!(state.total_items(), 3);
        assert_eq!(state.error(), Some("Out of stock"));

        let ticket = state.begin();
        state.apply(ticket, Some(cart(1, 4)));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_loading_never_underflows() {
        let mut state = CartState::default();
        state.fail(0, "x".into(), false);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_mirrors_are_shared_per_shopper() {
        let mirrors = ShopperMirrors::new();
        let id = Uuid::new_v4();

        let first = mirrors.get(id).await;
        first.cart.write().await.begin();

        let again = mirrors.get(id).await;
        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &mirrors.get(Uuid::new_v4()).await));
    }
}
