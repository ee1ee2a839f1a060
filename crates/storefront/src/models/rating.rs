//! Rating types.

use serde::{Deserialize, Serialize};

use perfume_shop_core::{RatingId, Stars};

/// A shopper's review of a perfume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,
    #[serde(default)]
    pub user_name: Option<String>,
    pub rating: Stars,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Create/update rating request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSubmission {
    pub rating: Stars,
    pub comment: String,
}
