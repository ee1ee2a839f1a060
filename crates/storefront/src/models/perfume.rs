//! Catalog types.

use serde::{Deserialize, Serialize};

use perfume_shop_core::{BrandId, CategoryId, FragranceFamily, Gender, PerfumeId, Price, Pricing};

/// Brand summary embedded in a perfume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRef {
    pub id: BrandId,
    pub name: String,
}

/// Category summary embedded in a perfume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

/// A perfume as listed by the catalog endpoints.
///
/// Listing endpoints omit some detail fields, so everything but the
/// identity and price is optional or defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perfume {
    pub id: PerfumeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub discounted_price: Option<Price>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub brand: Option<BrandRef>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub fragrance_family: Option<FragranceFamily>,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Bottle size as sent by the backend, e.g. `ML_100`.
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub rating_count: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub featured: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub bestseller: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub favorite: bool,
    /// Whether the signed-in shopper may rate this perfume.
    #[serde(default, rename = "canRating", deserialize_with = "super::null_as_default")]
    pub can_rate: bool,
}

impl Perfume {
    /// List price paired with the discount, if any.
    #[must_use]
    pub const fn pricing(&self) -> Pricing {
        Pricing::new(self.price, self.discounted_price)
    }

    /// Units in stock, treating unknown as zero.
    #[must_use]
    pub fn stock(&self) -> i64 {
        self.stock_quantity.unwrap_or(0).max(0)
    }

    /// Bottle size for display, e.g. `100ml`.
    #[must_use]
    pub fn volume_label(&self) -> Option<String> {
        self.volume
            .as_deref()
            .map(|volume| format!("{}ml", volume.trim_start_matches("ML_")))
    }

    /// Brand name, or an empty string.
    #[must_use]
    pub fn brand_name(&self) -> &str {
        self.brand.as_ref().map_or("", |brand| brand.name.as_str())
    }
}

/// A brand in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// A category in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
