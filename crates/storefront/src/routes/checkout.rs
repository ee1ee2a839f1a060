//! Checkout route handlers.
//!
//! Orders are not paid online: placing one hands the shopper a WhatsApp link
//! to confirm delivery with the shop.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use super::login_required;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Shopper;
use crate::services::checkout::{self, CheckoutOutcome};
use crate::views::{CartView, Layout};

/// Delivery details form data.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub customer_notes: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub form: CheckoutForm,
}

const LOGIN_TITLE: &str = "Sign in to checkout";
const LOGIN_MESSAGE: &str = "Please login to place your order.";

/// Display the delivery details form.
#[instrument(skip(shopper))]
pub async fn show(shopper: Shopper) -> Result<Response> {
    let Some(user) = shopper.user().await else {
        return Ok(login_required(&shopper, LOGIN_TITLE, LOGIN_MESSAGE).await);
    };

    let form = CheckoutForm {
        whatsapp_number: user.phone_number.unwrap_or_default(),
        ..CheckoutForm::default()
    };
    Ok(page(&shopper, form).await.into_response())
}

/// Place the order.
///
/// On success the shopper lands on their orders with the WhatsApp link; on
/// failure the form is shown again with what they typed.
#[instrument(skip(shopper, form))]
pub async fn submit(shopper: Shopper, Form(form): Form<CheckoutForm>) -> Result<Response> {
    if shopper.user().await.is_none() {
        return Ok(login_required(&shopper, LOGIN_TITLE, LOGIN_MESSAGE).await);
    }

    let outcome = checkout::place_order(
        &shopper.auth(),
        &form.whatsapp_number,
        &form.delivery_address,
        &form.customer_notes,
    )
    .await?;

    match outcome {
        CheckoutOutcome::Placed(toast) => {
            add_breadcrumb("checkout", "Order placed", None);
            shopper.notify(toast).await?;
            Ok(Redirect::to("/orders").into_response())
        }
        CheckoutOutcome::Failed(toast) => {
            let mut template = page(&shopper, form).await;
            template.layout.toasts.push(toast);
            Ok(template.into_response())
        }
    }
}

async fn page(shopper: &Shopper, form: CheckoutForm) -> CheckoutTemplate {
    let cart = CartView::from(shopper.cart().current().await.as_ref());
    CheckoutTemplate {
        layout: shopper.layout().await,
        cart,
        form,
    }
}
