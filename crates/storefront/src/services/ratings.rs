//! The rating widget.

use tracing::instrument;

use perfume_shop_core::{FormError, PerfumeId, validation};

use super::{or_default, settle};
use crate::api::{ApiError, Backend, TokenStore};
use crate::flash::Toast;
use crate::models::RatingSubmission;
use crate::views::{RatingPanel, RatingView};

/// Load public ratings and, for a signed-in shopper, their own rating.
///
/// The two are fetched independently; a failure of either leaves that part
/// empty.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip(backend), fields(perfume_id = %id))]
pub async fn panel<S: TokenStore>(
    backend: &Backend<'_, S>,
    id: PerfumeId,
    signed_in: bool,
    can_rate: bool,
) -> Result<RatingPanel, ApiError> {
    let mine = async {
        if signed_in {
            backend.my_rating(id).await
        } else {
            Ok(None)
        }
    };
    let (ratings, mine) = tokio::join!(backend.ratings(id), mine);

    Ok(RatingPanel {
        ratings: or_default(ratings, "ratings")?
            .iter()
            .map(RatingView::from)
            .collect(),
        mine: mine?.as_ref().map(RatingView::from),
        can_rate: signed_in && can_rate,
    })
}

/// Create or update the shopper's rating.
///
/// An existing rating is replaced with PUT; otherwise a new one is POSTed.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip(backend, comment), fields(perfume_id = %id))]
pub async fn submit<S: TokenStore>(
    backend: &Backend<'_, S>,
    id: PerfumeId,
    stars: Option<u8>,
    comment: &str,
) -> Result<Toast, ApiError> {
    let rating = match validation::rating(stars) {
        Ok(rating) => rating,
        Err(e) => return Ok(form_toast(e)),
    };

    let submission = RatingSubmission {
        rating,
        comment: comment.trim().to_string(),
    };

    let result = if backend.my_rating(id).await?.is_some() {
        backend.update_rating(id, &submission).await
    } else {
        backend.create_rating(id, &submission).await
    };

    settle(
        result,
        |()| Toast::success("Rating submitted", "Thank you for your review!"),
        "Error",
        "Failed to submit rating",
    )
}

fn form_toast(error: FormError) -> Toast {
    Toast::error(error.title(), error.to_string())
}
