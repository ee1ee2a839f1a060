//! Cart endpoints. Every mutation answers with the whole cart.

use reqwest::Method;
use tracing::instrument;

use perfume_shop_core::PerfumeId;

use super::{ApiError, Backend, TokenStore};
use crate::models::Cart;
use crate::models::cart::AddToCart;

impl<S: TokenStore> Backend<'_, S> {
    /// The shopper's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Cart, ApiError> {
        self.get("/carts", &[]).await
    }

    /// Add a perfume to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the line (e.g. out of stock).
    #[instrument(skip(self), fields(perfume_id = %perfume_id))]
    pub async fn add_to_cart(&self, perfume_id: PerfumeId, quantity: u32) -> Result<Cart, ApiError> {
        self.post(
            "/carts/add",
            &AddToCart {
                perfume_id,
                quantity,
            },
        )
        .await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the quantity.
    #[instrument(skip(self), fields(perfume_id = %perfume_id))]
    pub async fn update_cart_item(
        &self,
        perfume_id: PerfumeId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        self.put(
            "/carts/update",
            &[
                ("perfumeId", perfume_id.to_string()),
                ("quantity", quantity.to_string()),
            ],
            &serde_json::json!({}),
        )
        .await
    }

    /// Remove a perfume from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(perfume_id = %perfume_id))]
    pub async fn remove_from_cart(&self, perfume_id: PerfumeId) -> Result<Cart, ApiError> {
        self.delete(&format!("/carts/remove/{perfume_id}")).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.exec(Method::DELETE, "/carts/clear", &[], None).await
    }
}
