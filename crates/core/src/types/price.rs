//! Type-safe price representation using decimal arithmetic.
//!
//! The backend prices everything in a single currency and sends amounts as
//! JSON numbers, so [`Price`] is a thin wrapper over [`Decimal`] that knows
//! how to render itself. [`Pricing`] pairs a list price with an optional
//! discount and derives everything a product card shows.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// The amount rounded to cents, always with two decimal places (e.g. "80.00").
    #[must_use]
    pub fn to_fixed(&self) -> String {
        let mut cents = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        cents.rescale(2);
        cents.to_string()
    }

    /// Format for display (e.g. "$80.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${}", self.to_fixed())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// A list price with an optional discounted price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Regular price.
    pub price: Price,
    /// Discounted price, if the product is on sale.
    pub discounted: Option<Price>,
}

impl Pricing {
    /// Create pricing from a list price and optional discount.
    #[must_use]
    pub const fn new(price: Price, discounted: Option<Price>) -> Self {
        Self { price, discounted }
    }

    /// The price the customer pays.
    ///
    /// A missing or zero discounted price means "no discount".
    #[must_use]
    pub fn effective(&self) -> Price {
        self.discounted
            .filter(Price::is_positive)
            .unwrap_or(self.price)
    }

    /// Whether a positive discount percentage applies.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_percent().is_some()
    }

    /// Discount as a whole percentage of the list price, rounded half away
    /// from zero. `None` when there is no discount or it rounds to zero.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let discounted = self.discounted.filter(Price::is_positive)?;
        if !self.price.is_positive() {
            return None;
        }
        let ratio = (self.price.0 - discounted.0) / self.price.0 * Decimal::ONE_HUNDRED;
        let percent = ratio
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()?;
        (percent > 0).then_some(percent)
    }

    /// Badge text such as "20% OFF".
    #[must_use]
    pub fn badge(&self) -> Option<String> {
        self.discount_percent().map(|percent| format!("{percent}% OFF"))
    }
}
