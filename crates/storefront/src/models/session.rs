//! Session keys.
//!
//! Everything the storefront persists for a browser lives in its
//! tower-sessions session under one of these keys.

/// Session keys for shopper state.
pub mod keys {
    /// Bearer token issued by the backend at login.
    pub const TOKEN: &str = "token";

    /// Identifies the shopper's in-memory auth/cart mirror.
    pub const SHOPPER_ID: &str = "shopper_id";

    /// Pending notifications, shown on the next rendered page.
    pub const FLASH: &str = "flash";
}
