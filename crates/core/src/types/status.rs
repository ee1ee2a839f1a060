//! Status and classification enums mirrored from the backend.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Lowercase slug used for badge styling.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Target audience of a fragrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

impl Gender {
    /// All genders in display order.
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unisex];

    /// Wire value, as used in backend paths (`/gender/MALE`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Unisex => "UNISEX",
        }
    }

    /// Shopper-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Men",
            Self::Female => "Women",
            Self::Unisex => "Unisex",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            "UNISEX" => Ok(Self::Unisex),
            _ => Err(format!("invalid gender: {s}")),
        }
    }
}

/// Olfactory family of a fragrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FragranceFamily {
    Floral,
    Oriental,
    Woody,
    Fresh,
    Fruity,
    Spicy,
    Citrus,
    Aquatic,
    Green,
    Gourmand,
}

impl FragranceFamily {
    /// All families in display order.
    pub const ALL: [Self; 10] = [
        Self::Floral,
        Self::Oriental,
        Self::Woody,
        Self::Fresh,
        Self::Fruity,
        Self::Spicy,
        Self::Citrus,
        Self::Aquatic,
        Self::Green,
        Self::Gourmand,
    ];

    /// Wire value (`FLORAL`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Floral => "FLORAL",
            Self::Oriental => "ORIENTAL",
            Self::Woody => "WOODY",
            Self::Fresh => "FRESH",
            Self::Fruity => "FRUITY",
            Self::Spicy => "SPICY",
            Self::Citrus => "CITRUS",
            Self::Aquatic => "AQUATIC",
            Self::Green => "GREEN",
            Self::Gourmand => "GOURMAND",
        }
    }

    /// Shopper-facing label (`Floral`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Floral => "Floral",
            Self::Oriental => "Oriental",
            Self::Woody => "Woody",
            Self::Fresh => "Fresh",
            Self::Fruity => "Fruity",
            Self::Spicy => "Spicy",
            Self::Citrus => "Citrus",
            Self::Aquatic => "Aquatic",
            Self::Green => "Green",
            Self::Gourmand => "Gourmand",
        }
    }
}

impl std::fmt::Display for FragranceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FragranceFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == wanted)
            .ok_or_else(|| format!("invalid fragrance family: {s}"))
    }
}
