//! The per-request shopper.
//!
//! [`Shopper`] ties a browser session to its mirror: it reads (or assigns) the
//! shopper id in the session, reconciles the mirrored user with the persisted
//! token and, for page loads outside `/auth/`, refreshes the mirrored cart.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{Method, request::Parts},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::api::{ApiClient, Backend, SessionTokenStore};
use crate::error::AppError;
use crate::flash::{self, Toast};
use crate::models::{User, session_keys};
use crate::state::AppState;
use crate::stores::{AuthStore, CartStore, ShopperMirror};
use crate::views::{Layout, UserView};

/// Paths under this prefix never refresh the cart, so an expired session
/// can't redirect away from the login flow.
const AUTH_PREFIX: &str = "/auth/";

/// The browser session making the request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(shopper: Shopper) -> Result<impl IntoResponse> {
///     let layout = shopper.layout().await;
///     let favorites = shopper.backend().favorites().await?;
///     // ...
/// }
/// ```
pub struct Shopper {
    session: Session,
    tokens: SessionTokenStore,
    mirror: Arc<ShopperMirror>,
    api: ApiClient,
}

impl FromRequestParts<AppState> for Shopper {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let shopper_id = match session.get::<Uuid>(session_keys::SHOPPER_ID).await? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                session.insert(session_keys::SHOPPER_ID, id).await?;
                id
            }
        };

        let shopper = Self {
            tokens: SessionTokenStore::new(session.clone()),
            session,
            mirror: state.mirrors().get(shopper_id).await,
            api: state.api().clone(),
        };

        shopper.auth().initialize().await?;

        let refresh = parts.method == Method::GET && !parts.uri.path().starts_with(AUTH_PREFIX);
        if refresh && shopper.user().await.is_some() {
            shopper.cart().refresh().await?;
        }

        Ok(shopper)
    }
}

impl Shopper {
    /// Auth operations for this shopper.
    #[must_use]
    pub fn auth(&self) -> AuthStore<'_, SessionTokenStore> {
        AuthStore::new(&self.api, &self.tokens, &self.mirror)
    }

    /// Cart operations for this shopper.
    #[must_use]
    pub fn cart(&self) -> CartStore<'_, SessionTokenStore> {
        CartStore::new(&self.api, &self.tokens, &self.mirror)
    }

    /// Backend calls on behalf of this shopper.
    #[must_use]
    pub const fn backend(&self) -> Backend<'_, SessionTokenStore> {
        self.api.with_tokens(&self.tokens)
    }

    /// The shared backend client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The underlying session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The signed-in user, if any.
    pub async fn user(&self) -> Option<User> {
        self.mirror.auth.read().await.user().cloned()
    }

    /// Queue a notification for the next page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn notify(&self, toast: Toast) -> Result<(), AppError> {
        flash::push(&self.session, toast).await?;
        Ok(())
    }

    /// Page chrome for a rendered page. Takes pending notifications.
    pub async fn layout(&self) -> Layout {
        let user = self.user().await;
        let cart_count = if user.is_some() {
            self.mirror.cart.read().await.total_items()
        } else {
            0
        };

        Layout {
            user: user.as_ref().map(UserView::from),
            cart_count,
            toasts: flash::take(&self.session).await,
        }
    }
}
