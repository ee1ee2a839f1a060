//! Transport models mirroring the backend's JSON resources.
//!
//! These are never edited field-by-field for persistence: every mutation goes
//! to the backend and the response replaces the local copy.

pub mod cart;
pub mod order;
pub mod perfume;
pub mod rating;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem};
pub use order::{CheckoutReceipt, Order, OrderItem};
pub use perfume::{Brand, BrandRef, Category, CategoryRef, Perfume};
pub use rating::{Rating, RatingSubmission};
pub use session::keys as session_keys;
pub use user::{AuthResponse, ProfileUpdate, User};

use serde::Deserialize;

/// Deserialize an explicit `null` as the type's default.
///
/// `#[serde(default)]` alone only covers a missing key; the backend also
/// sends `null` for unset counters and flags.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
