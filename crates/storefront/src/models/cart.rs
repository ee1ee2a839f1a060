//! Cart types.

use serde::{Deserialize, Serialize};

use perfume_shop_core::{CartId, CartItemId, PerfumeId, Price};

use super::perfume::Perfume;

/// The shopper's server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<CartItem>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_items: u32,
    #[serde(default)]
    pub total_price: Price,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One cart line. The subtotal is computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub perfume: Perfume,
    pub quantity: u32,
    #[serde(default)]
    pub subtotal: Price,
}

/// Add-to-cart request body.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub perfume_id: PerfumeId,
    pub quantity: u32,
}
