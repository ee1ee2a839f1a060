//! Order endpoints.

use tracing::instrument;

use perfume_shop_core::validation::CheckoutDetails;

use super::{ApiError, Backend, TokenStore};
use crate::models::{CheckoutReceipt, Order};

impl<S: TokenStore> Backend<'_, S> {
    /// Turn the cart into an order and get the WhatsApp hand-off link.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the checkout.
    #[instrument(skip(self, details))]
    pub async fn checkout(&self, details: &CheckoutDetails) -> Result<CheckoutReceipt, ApiError> {
        self.post("/api/orders/checkout", details).await
    }

    /// The shopper's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let orders: Option<Vec<Order>> = self.get("/api/orders/my-orders", &[]).await?;
        Ok(orders.unwrap_or_default())
    }
}
