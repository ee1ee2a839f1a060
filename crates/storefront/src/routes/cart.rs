//! Cart route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use perfume_shop_core::PerfumeId;

use super::{blank_as_none, login_required};
use crate::error::Result;
use crate::filters;
use crate::flash::Toast;
use crate::middleware::Shopper;
use crate::stores::CartError;
use crate::views::{CartView, Layout};

const CART_PATH: &str = "/cart";

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub perfume_id: PerfumeId,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub quantity: Option<i64>,
}

/// Line removal form data.
#[derive(Debug, Deserialize)]
pub struct RemoveItemForm {
    pub perfume_id: PerfumeId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub error: Option<String>,
}

/// Display the cart.
#[instrument(skip(shopper))]
pub async fn show(shopper: Shopper) -> Result<Response> {
    if shopper.user().await.is_none() {
        return Ok(login_required(
            &shopper,
            "Sign in to view your cart",
            "Please login to view and manage your shopping cart.",
        )
        .await);
    }

    let store = shopper.cart();
    let cart = CartView::from(store.current().await.as_ref());
    let error = store.error().await;

    Ok(CartShowTemplate {
        layout: shopper.layout().await,
        cart,
        error,
    }
    .into_response())
}

/// Set a line's quantity. Blank quantities and quantities below one are ignored.
#[instrument(skip(shopper, form), fields(perfume_id = %form.perfume_id))]
pub async fn update(shopper: Shopper, Form(form): Form<UpdateQuantityForm>) -> Result<Redirect> {
    let Some(Ok(quantity)) = form.quantity.map(u32::try_from) else {
        return Ok(Redirect::to(CART_PATH));
    };
    if quantity < 1 {
        return Ok(Redirect::to(CART_PATH));
    }

    if let Err(e) = shopper.cart().update(form.perfume_id, quantity).await {
        report(&shopper, e).await?;
    }
    Ok(Redirect::to(CART_PATH))
}

/// Remove a line.
#[instrument(skip(shopper, form), fields(perfume_id = %form.perfume_id))]
pub async fn remove(shopper: Shopper, Form(form): Form<RemoveItemForm>) -> Result<Redirect> {
    match shopper.cart().remove(form.perfume_id).await {
        Ok(_) => {
            shopper
                .notify(Toast::success(
                    "Item removed",
                    "Item has been removed from your cart",
                ))
                .await?;
        }
        Err(e) => report(&shopper, e).await?,
    }
    Ok(Redirect::to(CART_PATH))
}

/// Empty the cart.
#[instrument(skip(shopper))]
pub async fn clear(shopper: Shopper) -> Result<Redirect> {
    match shopper.cart().clear().await {
        Ok(()) => {
            shopper
                .notify(Toast::success(
                    "Cart cleared",
                    "All items have been removed from your cart",
                ))
                .await?;
        }
        Err(e) => report(&shopper, e).await?,
    }
    Ok(Redirect::to(CART_PATH))
}

/// Turn a failed cart mutation into a notification.
///
/// An expired session still escalates to the login redirect.
async fn report(shopper: &Shopper, error: CartError) -> Result<()> {
    if error.is_session_expired() || !matches!(error, CartError::Failed { .. }) {
        return Err(error.into());
    }
    shopper.notify(Toast::error("Error", error.to_string())).await?;
    Ok(())
}
