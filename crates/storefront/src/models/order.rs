//! Order types.

use serde::{Deserialize, Serialize};

use perfume_shop_core::{OrderId, OrderItemId, OrderStatus, Price};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<OrderItem>,
    pub total_amount: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub customer_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One line of an order, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_name: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub subtotal: Price,
}

/// Checkout response: the WhatsApp hand-off link and a confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub whatsapp_link: String,
    #[serde(default)]
    pub message: Option<String>,
}
