//! Catalog endpoints: perfumes, brands, categories.

use tracing::{debug, instrument};

use perfume_shop_core::{ListingQuery, PerfumeId};

use super::cache::{CacheKey, CacheValue};
use super::{ApiError, Backend, TokenStore};
use crate::models::{Brand, Category, Perfume};

impl<S: TokenStore> Backend<'_, S> {
    /// List perfumes for one listing strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(kind = query.kind()))]
    pub async fn perfumes(&self, query: &ListingQuery) -> Result<Vec<Perfume>, ApiError> {
        let perfumes: Option<Vec<Perfume>> = self.get(&query.path(), &query.params()).await?;
        Ok(perfumes.unwrap_or_default())
    }

    /// Get a single perfume.
    ///
    /// # Errors
    ///
    /// Returns an error if the perfume does not exist or the API request fails.
    #[instrument(skip(self), fields(perfume_id = %id))]
    pub async fn perfume(&self, id: PerfumeId) -> Result<Perfume, ApiError> {
        self.get(&format!("/api/perfumes/{id}"), &[]).await
    }

    /// Perfumes similar to the given one.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(perfume_id = %id))]
    pub async fn similar_perfumes(&self, id: PerfumeId) -> Result<Vec<Perfume>, ApiError> {
        let perfumes: Option<Vec<Perfume>> =
            self.get(&format!("/api/perfumes/{id}/similar"), &[]).await?;
        Ok(perfumes.unwrap_or_default())
    }

    /// All brands. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
        if let Some(CacheValue::Brands(brands)) = self.client.inner.cache.get(&CacheKey::Brands).await {
            debug!("Cache hit for brands");
            return Ok(brands);
        }

        let brands: Option<Vec<Brand>> = self.get("/api/brands", &[]).await?;
        let brands = brands.unwrap_or_default();

        self.client
            .inner
            .cache
            .insert(CacheKey::Brands, CacheValue::Brands(brands.clone()))
            .await;

        Ok(brands)
    }

    /// All categories. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.client.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Option<Vec<Category>> = self.get("/api/categories", &[]).await?;
        let categories = categories.unwrap_or_default();

        self.client
            .inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }
}
