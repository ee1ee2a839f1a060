//! Checkout: the cart becomes an order handed off to WhatsApp.

use tracing::{info, instrument, warn};

use perfume_shop_core::validation;

use crate::api::{ApiError, TokenStore};
use crate::flash::Toast;
use crate::stores::AuthStore;

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The order was placed; the toast carries the WhatsApp link.
    Placed(Toast),
    /// Nothing was ordered.
    Failed(Toast),
}

/// Place an order from the cart, then clear the cart.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip_all)]
pub async fn place_order<S: TokenStore>(
    auth: &AuthStore<'_, S>,
    whatsapp_number: &str,
    delivery_address: &str,
    notes: &str,
) -> Result<CheckoutOutcome, ApiError> {
    let details = match validation::checkout(whatsapp_number, delivery_address, notes) {
        Ok(details) => details,
        Err(e) => {
            return Ok(CheckoutOutcome::Failed(Toast::error(e.title(), e.to_string())));
        }
    };

    let receipt = match auth.backend().checkout(&details).await {
        Ok(receipt) => receipt,
        Err(ApiError::SessionExpired) => return Err(ApiError::SessionExpired),
        Err(e) => {
            warn!(error = %e, "Checkout failed");
            return Ok(CheckoutOutcome::Failed(Toast::error(
                "Checkout failed",
                e.message_or("Something went wrong"),
            )));
        }
    };
    info!("Order placed");

    let cart = auth.cart();
    if let Err(e) = cart.clear().await {
        if e.is_session_expired() {
            return Err(ApiError::SessionExpired);
        }
        warn!(error = %e, "Failed to clear cart after checkout");
        cart.reset().await;
    }

    let toast = Toast::success(
        "Order placed successfully!",
        receipt.message.unwrap_or_default(),
    );
    let toast = if receipt.whatsapp_link.is_empty() {
        toast
    } else {
        toast.with_link(receipt.whatsapp_link)
    };
    Ok(CheckoutOutcome::Placed(toast))
}
