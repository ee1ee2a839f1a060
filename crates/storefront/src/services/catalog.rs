//! Catalog pages: home curation, the product listing and product detail.

use tracing::{info, instrument, warn};

use perfume_shop_core::{ListingFilters, ListingParams, ListingQuery, PerfumeId};

use super::or_default;
use crate::api::{ApiError, Backend, TokenStore};
use crate::models::{Brand, Category, Perfume};

/// Most perfumes shown in a curated home section.
pub const CURATED_LIMIT: usize = 8;

/// Pick the flagged perfumes, or the first ones when none are flagged.
#[must_use]
pub fn curate(perfumes: Vec<Perfume>, flagged: impl Fn(&Perfume) -> bool) -> Vec<Perfume> {
    let picked: Vec<Perfume> = perfumes.iter().filter(|p| flagged(p)).cloned().collect();
    let mut picked = if picked.is_empty() { perfumes } else { picked };
    picked.truncate(CURATED_LIMIT);
    picked
}

/// Everything on the home page.
#[derive(Debug, Clone, Default)]
pub struct HomeCatalog {
    pub featured: Vec<Perfume>,
    pub bestsellers: Vec<Perfume>,
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
}

/// Load the home page sections concurrently. Sections that fail are empty.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip(backend))]
pub async fn home<S: TokenStore>(backend: &Backend<'_, S>) -> Result<HomeCatalog, ApiError> {
    let (featured, bestsellers, brands, categories) = tokio::join!(
        curated(backend, ListingQuery::Featured, |p| p.featured),
        curated(backend, ListingQuery::Bestsellers, |p| p.bestseller),
        backend.brands(),
        backend.categories(),
    );

    Ok(HomeCatalog {
        featured: or_default(featured, "featured perfumes")?,
        bestsellers: or_default(bestsellers, "bestsellers")?,
        brands: or_default(brands, "brands")?,
        categories: or_default(categories, "categories")?,
    })
}

/// A curated section: the dedicated endpoint, falling back to all perfumes.
async fn curated<S: TokenStore>(
    backend: &Backend<'_, S>,
    query: ListingQuery,
    flagged: fn(&Perfume) -> bool,
) -> Result<Vec<Perfume>, ApiError> {
    let perfumes = match backend.perfumes(&query).await {
        Ok(perfumes) => perfumes,
        Err(ApiError::SessionExpired) => return Err(ApiError::SessionExpired),
        Err(e) => {
            info!(error = %e, kind = query.kind(), "Curated endpoint failed, using all perfumes");
            backend.perfumes(&ListingQuery::All).await?
        }
    };
    Ok(curate(perfumes, flagged))
}

/// The product listing page.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub filters: ListingFilters,
    pub perfumes: Vec<Perfume>,
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
    /// Set when the perfume query itself failed.
    pub error: Option<String>,
}

/// Resolve the filters to one backend query and load the page.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip(backend))]
pub async fn listing<S: TokenStore>(
    backend: &Backend<'_, S>,
    params: &ListingParams,
) -> Result<Listing, ApiError> {
    let filters = ListingFilters::from_params(params);
    let query = filters.query();

    let (perfumes, brands, categories) =
        tokio::join!(backend.perfumes(&query), backend.brands(), backend.categories());

    let (perfumes, error) = match perfumes {
        Ok(perfumes) => (perfumes, None),
        Err(ApiError::SessionExpired) => return Err(ApiError::SessionExpired),
        Err(e) => {
            warn!(error = %e, kind = query.kind(), "Failed to fetch perfumes");
            (Vec::new(), Some(e.message_or("Failed to load perfumes")))
        }
    };

    Ok(Listing {
        filters,
        perfumes,
        brands: or_default(brands, "brands")?,
        categories: or_default(categories, "categories")?,
        error,
    })
}

/// The product detail page, minus ratings.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub perfume: Perfume,
    pub similar: Vec<Perfume>,
}

/// Load a perfume and its similar perfumes.
///
/// # Errors
///
/// Returns an error if the perfume itself cannot be loaded.
#[instrument(skip(backend), fields(perfume_id = %id))]
pub async fn product<S: TokenStore>(
    backend: &Backend<'_, S>,
    id: PerfumeId,
) -> Result<ProductPage, ApiError> {
    let (perfume, similar) = tokio::join!(backend.perfume(id), backend.similar_perfumes(id));
    Ok(ProductPage {
        perfume: perfume?,
        similar: or_default(similar, "similar perfumes")?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn perfume(id: i64, featured: bool) -> Perfume {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Perfume {id}"),
            "price": 10,
            "featured": featured,
        }))
        .unwrap()
    }

    #[test]
    fn test_curate_prefers_flagged() {
        let perfumes = vec![perfume(1, false), perfume(2, true), perfume(3, true)];
        let picked = curate(perfumes, |p| p.featured);
        let ids: Vec<i64> = picked.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_curate_falls_back_to_first_items() {
        let perfumes: Vec<Perfume> = (1..=12).map(|id| perfume(id, false)).collect();
        let picked = curate(perfumes, |p| p.featured);
        assert_eq!(picked.len(), CURATED_LIMIT);
        assert_eq!(picked[0].id.as_i64(), 1);
    }

    #[test]
    fn test_curate_caps_flagged() {
        let perfumes: Vec<Perfume> = (1..=10).map(|id| perfume(id, true)).collect();
        assert_eq!(curate(perfumes, |p| p.featured).len(), CURATED_LIMIT);
    }
}
