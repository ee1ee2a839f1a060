//! Account route handlers: orders, favorites and profile.
//!
//! Anonymous shoppers get the login prompt page instead of a redirect, so
//! the URL they asked for stays in the address bar.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{instrument, warn};

use super::{login_required, require_login};
use crate::api::ApiError;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::flash::Toast;
use crate::middleware::Shopper;
use crate::services::profile;
use crate::views::{Layout, OrderView, PerfumeCard, UserView, cards};

const PROFILE_PATH: &str = "/profile";

// =============================================================================
// Form Types
// =============================================================================

/// Profile details form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

/// Password change form data.
#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Account deletion form data.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountForm {
    /// Checkbox value; must be `yes`.
    pub confirm: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderView>,
}

/// Favorites template.
#[derive(Template, WebTemplate)]
#[template(path = "account/favorites.html")]
pub struct FavoritesTemplate {
    pub layout: Layout,
    pub perfumes: Vec<PerfumeCard>,
    pub return_to: &'static str,
}

/// Profile template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub user: UserView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the shopper's orders, newest first as the backend sends them.
#[instrument(skip(shopper))]
pub async fn orders(shopper: Shopper) -> Result<Response> {
    if shopper.user().await.is_none() {
        return Ok(login_required(
            &shopper,
            "Sign in to view your orders",
            "Please login to see your order history.",
        )
        .await);
    }

    let orders = match shopper.backend().my_orders().await {
        Ok(orders) => orders,
        Err(ApiError::SessionExpired) => return Err(ApiError::SessionExpired.into()),
        Err(e) => {
            warn!(error = %e, "Failed to load orders");
            shopper
                .notify(Toast::error("Error", "Failed to load orders"))
                .await?;
            Vec::new()
        }
    };

    Ok(OrdersTemplate {
        layout: shopper.layout().await,
        orders: orders.iter().map(OrderView::from).collect(),
    }
    .into_response())
}

/// Display the shopper's favorite perfumes.
#[instrument(skip(shopper))]
pub async fn favorites(shopper: Shopper) -> Result<Response> {
    if shopper.user().await.is_none() {
        return Ok(login_required(
            &shopper,
            "Sign in to view your favorites",
            "Please login to see the perfumes you saved.",
        )
        .await);
    }

    let perfumes = match shopper.backend().favorites().await {
        Ok(perfumes) => perfumes,
        Err(ApiError::SessionExpired) => return Err(ApiError::SessionExpired.into()),
        Err(e) => {
            warn!(error = %e, "Failed to load favorites");
            shopper
                .notify(Toast::error("Error", "Failed to load favorites"))
                .await?;
            Vec::new()
        }
    };

    let mut perfumes = cards(&perfumes);
    for card in &mut perfumes {
        card.favorite = true;
    }

    Ok(FavoritesTemplate {
        layout: shopper.layout().await,
        perfumes,
        return_to: "/favorites",
    }
    .into_response())
}

/// Display the profile page.
#[instrument(skip(shopper))]
pub async fn profile(shopper: Shopper) -> Result<Response> {
    let Some(user) = shopper.user().await else {
        return Ok(login_required(
            &shopper,
            "Sign in to view your profile",
            "Please login to manage your account.",
        )
        .await);
    };

    Ok(ProfileTemplate {
        layout: shopper.layout().await,
        user: UserView::from(&user),
    }
    .into_response())
}

/// Update name, email and phone number.
#[instrument(skip(shopper, form))]
pub async fn update_profile(shopper: Shopper, Form(form): Form<ProfileForm>) -> Result<Response> {
    if shopper.user().await.is_none() {
        return require_login(&shopper, "update your profile").await;
    }

    let toast = profile::update(&shopper.auth(), &form.name, &form.email, &form.phone_number).await?;
    shopper.notify(toast).await?;
    Ok(Redirect::to(PROFILE_PATH).into_response())
}

/// Change the password.
#[instrument(skip(shopper, form))]
pub async fn change_password(shopper: Shopper, Form(form): Form<PasswordForm>) -> Result<Response> {
    if shopper.user().await.is_none() {
        return require_login(&shopper, "change your password").await;
    }

    let toast = profile::change_password(
        &shopper.auth(),
        &form.current_password,
        &form.new_password,
        &form.confirm_password,
    )
    .await?;
    shopper.notify(toast).await?;
    Ok(Redirect::to(PROFILE_PATH).into_response())
}

/// Delete the account. The confirmation checkbox must be ticked.
#[instrument(skip(shopper, form))]
pub async fn delete_account(
    shopper: Shopper,
    Form(form): Form<DeleteAccountForm>,
) -> Result<Response> {
    if shopper.user().await.is_none() {
        return require_login(&shopper, "delete your account").await;
    }

    if form.confirm.as_deref() != Some("yes") {
        shopper
            .notify(Toast::error(
                "Confirmation required",
                "Tick the box to confirm you want to delete your account",
            ))
            .await?;
        return Ok(Redirect::to(PROFILE_PATH).into_response());
    }

    let (deleted, toast) = profile::delete_account(&shopper.auth()).await?;
    shopper.notify(toast).await?;

    if deleted {
        add_breadcrumb("auth", "Account deleted", None);
        return Ok(Redirect::to("/").into_response());
    }
    Ok(Redirect::to(PROFILE_PATH).into_response())
}
