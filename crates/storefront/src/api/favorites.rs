//! Favorites endpoints.

use reqwest::Method;
use tracing::instrument;

use perfume_shop_core::PerfumeId;

use super::{ApiError, Backend, TokenStore};
use crate::models::Perfume;

impl<S: TokenStore> Backend<'_, S> {
    /// The shopper's favorite perfumes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn favorites(&self) -> Result<Vec<Perfume>, ApiError> {
        let perfumes: Option<Vec<Perfume>> = self.get("/api/favorites/my-favorites", &[]).await?;
        Ok(perfumes.unwrap_or_default())
    }

    /// Flip the favorite flag of a perfume.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(perfume_id = %id))]
    pub async fn toggle_favorite(&self, id: PerfumeId) -> Result<(), ApiError> {
        self.exec(
            Method::POST,
            &format!("/api/favorites/toggle/{id}"),
            &[],
            None,
        )
        .await
    }
}
