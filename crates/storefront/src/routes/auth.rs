//! Authentication route handlers.
//!
//! Handles login, registration, email verification and logout against the
//! backend's `/api/auth` endpoints. Only verified accounts are signed in.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{LOGIN_PATH, Result, add_breadcrumb};
use crate::filters;
use crate::flash::Toast;
use crate::middleware::Shopper;
use crate::stores::AuthError;
use crate::views::Layout;

const VERIFY_PATH: &str = "/auth/verify";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Verification form data.
#[derive(Debug, Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub verification_code: String,
}

/// Resend form data.
#[derive(Debug, Deserialize)]
pub struct ResendForm {
    #[serde(default)]
    pub email: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Prefilled email carried across the auth pages.
#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// Verification page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify.html")]
pub struct VerifyTemplate {
    pub layout: Layout,
    pub email: String,
}

fn with_email(path: &str, email: &str) -> String {
    if email.trim().is_empty() {
        return path.to_string();
    }
    format!("{path}?email={}", urlencoding::encode(email.trim()))
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(shopper: Shopper, Query(query): Query<EmailQuery>) -> Result<Response> {
    if shopper.user().await.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(LoginTemplate {
        layout: shopper.layout().await,
        email: query.email.unwrap_or_default(),
    }
    .into_response())
}

/// Handle login form submission.
///
/// Unverified accounts are sent to the verification page without a session.
#[instrument(skip(shopper, form))]
pub async fn login(shopper: Shopper, Form(form): Form<LoginForm>) -> Result<Redirect> {
    match shopper.auth().login(&form.email, &form.password).await {
        Ok(user) => {
            add_breadcrumb("auth", "Logged in", Some(&[("user_id", &user.id.to_string())]));
            shopper
                .notify(Toast::success(
                    "Login successful! 🎉",
                    "Welcome back to PerfumeShop!",
                ))
                .await?;
            Ok(Redirect::to("/"))
        }
        Err(e @ AuthError::Unverified { .. }) => {
            shopper
                .notify(Toast::error("Email not verified", e.to_string()))
                .await?;
            Ok(Redirect::to(&with_email(VERIFY_PATH, &form.email)))
        }
        Err(AuthError::Form(e)) => {
            shopper.notify(Toast::error(e.title(), e.to_string())).await?;
            Ok(Redirect::to(&with_email(LOGIN_PATH, &form.email)))
        }
        Err(e) => {
            shopper
                .notify(Toast::error("Login failed", e.message_or("Login failed")))
                .await?;
            Ok(Redirect::to(&with_email(LOGIN_PATH, &form.email)))
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(shopper: Shopper) -> Result<Response> {
    if shopper.user().await.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(RegisterTemplate {
        layout: shopper.layout().await,
        name: String::new(),
        email: String::new(),
        phone_number: String::new(),
    }
    .into_response())
}

/// Handle registration form submission.
///
/// Registration does not sign in; the shopper is sent on to verify their
/// email. Failures re-render the form with what was typed.
#[instrument(skip(shopper, form))]
pub async fn register(shopper: Shopper, Form(form): Form<RegisterForm>) -> Result<Response> {
    let result = shopper
        .auth()
        .register(
            &form.name,
            &form.email,
            &form.phone_number,
            &form.password,
            &form.confirm_password,
        )
        .await;

    let toast = match result {
        Ok(email) => {
            add_breadcrumb("auth", "Registered", None);
            shopper
                .notify(Toast::success(
                    "Registration successful! 🎉",
                    "Please check your email for verification code",
                ))
                .await?;
            return Ok(Redirect::to(&with_email(VERIFY_PATH, &email)).into_response());
        }
        Err(AuthError::Form(e)) => Toast::error(e.title(), e.to_string()),
        Err(e) => Toast::error("Registration failed", e.message_or("Registration failed")),
    };

    let mut template = RegisterTemplate {
        layout: shopper.layout().await,
        name: form.name,
        email: form.email,
        phone_number: form.phone_number,
    };
    template.layout.toasts.push(toast);
    Ok(template.into_response())
}

// =============================================================================
// Verification Routes
// =============================================================================

/// Display the verification page.
pub async fn verify_page(shopper: Shopper, Query(query): Query<EmailQuery>) -> Result<VerifyTemplate> {
    Ok(VerifyTemplate {
        layout: shopper.layout().await,
        email: query.email.unwrap_or_default(),
    })
}

/// Handle a verification code submission.
#[instrument(skip(shopper, form))]
pub async fn verify(shopper: Shopper, Form(form): Form<VerifyForm>) -> Result<Redirect> {
    match shopper
        .auth()
        .verify(&form.email, &form.verification_code)
        .await
    {
        Ok(()) => {
            shopper
                .notify(Toast::success(
                    "Email verified successfully! ✅",
                    "You can now login to your account",
                ))
                .await?;
            Ok(Redirect::to(&with_email(LOGIN_PATH, &form.email)))
        }
        Err(e) => {
            shopper
                .notify(Toast::error(
                    "Verification failed",
                    e.message_or("Invalid verification code. Please try again."),
                ))
                .await?;
            Ok(Redirect::to(&with_email(VERIFY_PATH, &form.email)))
        }
    }
}

/// Send a new verification code.
#[instrument(skip(shopper, form))]
pub async fn resend(shopper: Shopper, Form(form): Form<ResendForm>) -> Result<Redirect> {
    let toast = match shopper.auth().resend_verification(&form.email).await {
        Ok(()) => Toast::success(
            "Verification code sent! 📧",
            "Please check your email for the new verification code",
        ),
        Err(AuthError::Form(e)) => Toast::error(e.title(), e.to_string()),
        Err(e) => Toast::error(
            "Failed to resend code",
            e.message_or("Something went wrong. Please try again."),
        ),
    };

    shopper.notify(toast).await?;
    Ok(Redirect::to(&with_email(VERIFY_PATH, &form.email)))
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
#[instrument(skip(shopper))]
pub async fn logout(shopper: Shopper) -> Result<Redirect> {
    shopper.auth().logout().await?;
    add_breadcrumb("auth", "Logged out", None);
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_email_encodes() {
        assert_eq!(
            with_email(VERIFY_PATH, "a+b@example.com"),
            "/auth/verify?email=a%2Bb%40example.com"
        );
        assert_eq!(with_email(LOGIN_PATH, "  "), "/auth/login");
    }
}
