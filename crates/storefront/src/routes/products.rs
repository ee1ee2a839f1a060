//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{OriginalUri, Path, Query},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use perfume_shop_core::{ListingParams, PerfumeId, validation};

use super::{blank_as_none, require_login, return_path};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::flash::Toast;
use crate::middleware::Shopper;
use crate::services::{catalog, favorites, ratings};
use crate::stores::CartError;
use crate::views::{FilterPanel, Layout, PerfumeCard, PerfumeDetail, RatingPanel, cards};

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub quantity: Option<i64>,
    /// Units in stock as shown on the page; absent on listing cards.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub stock: Option<i64>,
    pub return_to: Option<String>,
}

/// Favorite toggle form data.
#[derive(Debug, Deserialize)]
pub struct FavoriteForm {
    pub name: String,
    #[serde(default)]
    pub was_favorite: bool,
    pub return_to: Option<String>,
}

/// Rating form data.
#[derive(Debug, Deserialize)]
pub struct RatingForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub comment: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub panel: FilterPanel,
    pub perfumes: Vec<PerfumeCard>,
    pub error: Option<String>,
    pub return_to: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub perfume: PerfumeDetail,
    pub similar: Vec<PerfumeCard>,
    pub ratings: RatingPanel,
    pub return_to: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product listing.
///
/// Exactly one backend query is made for the perfumes, chosen by the
/// filter precedence.
#[instrument(skip(shopper, uri))]
pub async fn index(
    shopper: Shopper,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ListingParams>,
) -> Result<ProductsIndexTemplate> {
    let listing = catalog::listing(&shopper.backend(), &params).await?;

    Ok(ProductsIndexTemplate {
        layout: shopper.layout().await,
        panel: FilterPanel::new(&listing.filters, &listing.brands, &listing.categories),
        perfumes: cards(&listing.perfumes),
        error: listing.error,
        return_to: uri
            .path_and_query()
            .map_or_else(|| "/products".to_string(), ToString::to_string),
    })
}

/// Display a product.
#[instrument(skip(shopper), fields(perfume_id = %id))]
pub async fn show(shopper: Shopper, Path(id): Path<PerfumeId>) -> Result<ProductShowTemplate> {
    let backend = shopper.backend();
    let page = catalog::product(&backend, id).await?;
    let signed_in = shopper.user().await.is_some();
    let ratings = ratings::panel(&backend, id, signed_in, page.perfume.can_rate).await?;

    add_breadcrumb("navigation", "Viewed product", Some(&[("perfume_id", &id.to_string())]));

    Ok(ProductShowTemplate {
        layout: shopper.layout().await,
        perfume: PerfumeDetail::from(&page.perfume),
        similar: cards(&page.similar),
        ratings,
        return_to: format!("/products/{id}"),
    })
}

/// Add a perfume to the cart.
#[instrument(skip(shopper, form), fields(perfume_id = %id))]
pub async fn add_to_cart(
    shopper: Shopper,
    Path(id): Path<PerfumeId>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let back = return_path(form.return_to.as_deref(), &format!("/products/{id}"));
    if shopper.user().await.is_none() {
        return require_login(&shopper, "add items to cart").await;
    }

    let quantity = validation::clamp_quantity(
        form.quantity.unwrap_or(1),
        form.stock.unwrap_or(i64::MAX),
    );

    let toast = match shopper.cart().add(id, quantity).await {
        Ok(_) => {
            add_breadcrumb("cart", "Added to cart", Some(&[("perfume_id", &id.to_string())]));
            Toast::success(
                "Added to cart",
                format!("{} has been added to your cart", form.name),
            )
        }
        Err(CartError::NotAuthenticated) => {
            return require_login(&shopper, "add items to cart").await;
        }
        Err(e) if e.is_session_expired() => return Err(e.into()),
        Err(e) => Toast::error("Error", e.to_string()),
    };

    shopper.notify(toast).await?;
    Ok(Redirect::to(&back).into_response())
}

/// Toggle a perfume's favorite flag.
#[instrument(skip(shopper, form), fields(perfume_id = %id))]
pub async fn toggle_favorite(
    shopper: Shopper,
    Path(id): Path<PerfumeId>,
    Form(form): Form<FavoriteForm>,
) -> Result<Response> {
    let back = return_path(form.return_to.as_deref(), &format!("/products/{id}"));
    if shopper.user().await.is_none() {
        return require_login(&shopper, "add favorites").await;
    }

    let toast = favorites::toggle(&shopper.backend(), id, &form.name, form.was_favorite).await?;
    shopper.notify(toast).await?;
    Ok(Redirect::to(&back).into_response())
}

/// Create or update the shopper's rating.
#[instrument(skip(shopper, form), fields(perfume_id = %id))]
pub async fn rate(
    shopper: Shopper,
    Path(id): Path<PerfumeId>,
    Form(form): Form<RatingForm>,
) -> Result<Response> {
    if shopper.user().await.is_none() {
        return require_login(&shopper, "rate this perfume").await;
    }

    let toast = ratings::submit(&shopper.backend(), id, form.rating, &form.comment).await?;
    shopper.notify(toast).await?;
    Ok(Redirect::to(&format!("/products/{id}#reviews")).into_response())
}
