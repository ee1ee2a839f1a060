//! Rating endpoints.

use tracing::{debug, instrument};

use perfume_shop_core::PerfumeId;

use super::{ApiError, Backend, TokenStore};
use crate::models::{Rating, RatingSubmission};

impl<S: TokenStore> Backend<'_, S> {
    /// Public ratings of a perfume.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(perfume_id = %id))]
    pub async fn ratings(&self, id: PerfumeId) -> Result<Vec<Rating>, ApiError> {
        let ratings: Option<Vec<Rating>> =
            self.get(&format!("/api/ratings/perfume/{id}"), &[]).await?;
        Ok(ratings.unwrap_or_default())
    }

    /// The shopper's own rating of a perfume.
    ///
    /// Any failure other than an expired session means "not rated yet".
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SessionExpired`] if the token was rejected.
    #[instrument(skip(self), fields(perfume_id = %id))]
    pub async fn my_rating(&self, id: PerfumeId) -> Result<Option<Rating>, ApiError> {
        match self
            .get::<Option<Rating>>(&format!("/api/ratings/perfume/{id}/my-rating"), &[])
            .await
        {
            Ok(rating) => Ok(rating),
            Err(ApiError::SessionExpired) => Err(ApiError::SessionExpired),
            Err(e) => {
                debug!(error = %e, "No prior rating");
                Ok(None)
            }
        }
    }

    /// Create the shopper's rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the rating.
    #[instrument(skip(self, submission), fields(perfume_id = %id))]
    pub async fn create_rating(
        &self,
        id: PerfumeId,
        submission: &RatingSubmission,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post(&format!("/api/ratings/perfume/{id}"), submission)
            .await?;
        Ok(())
    }

    /// Replace the shopper's existing rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the rating.
    #[instrument(skip(self, submission), fields(perfume_id = %id))]
    pub async fn update_rating(
        &self,
        id: PerfumeId,
        submission: &RatingSubmission,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .put(&format!("/api/ratings/perfume/{id}"), &[], submission)
            .await?;
        Ok(())
    }
}
