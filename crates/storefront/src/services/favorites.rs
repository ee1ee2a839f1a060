//! Favorite toggling.

use tracing::instrument;

use perfume_shop_core::PerfumeId;

use super::settle;
use crate::api::{ApiError, Backend, TokenStore};
use crate::flash::Toast;

/// Flip a perfume's favorite flag.
///
/// `was_favorite` is the flag the shopper saw, which picks the wording.
///
/// # Errors
///
/// Returns [`ApiError::SessionExpired`] if the backend rejected the token.
#[instrument(skip(backend, name), fields(perfume_id = %id))]
pub async fn toggle<S: TokenStore>(
    backend: &Backend<'_, S>,
    id: PerfumeId,
    name: &str,
    was_favorite: bool,
) -> Result<Toast, ApiError> {
    settle(
        backend.toggle_favorite(id).await,
        |()| toggled(name, was_favorite),
        "Error",
        "Failed to update favorites",
    )
}

fn toggled(name: &str, was_favorite: bool) -> Toast {
    if was_favorite {
        Toast::success(
            "Removed from favorites",
            format!("{name} has been removed from your favorites"),
        )
    } else {
        Toast::success(
            "Added to favorites",
            format!("{name} has been added to your favorites"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_wording() {
        assert_eq!(toggled("Oud", false).title, "Added to favorites");
        assert_eq!(
            toggled("Oud", true).message,
            "Oud has been removed from your favorites"
        );
    }
}
