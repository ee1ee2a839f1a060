//! Form validation run before anything is sent to the backend.
//!
//! Each function takes raw form fields and either returns a normalized,
//! ready-to-serialize request body or the first [`FormError`] found, in the
//! order the fields appear on the page. The backend re-validates everything;
//! these checks only spare the shopper a round trip.

use core::fmt;

use serde::Serialize;

use crate::types::{Email, PhoneNumber, Stars};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A client-side validation failure.
///
/// `Display` yields the message shown to the shopper; [`FormError::title`]
/// yields the notification heading.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("Full name is required")]
    NameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Phone number is required")]
    PhoneRequired,
    #[error("Phone number must start with +994 (Azerbaijan country code)")]
    PhoneCountryCode,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please fill in all fields")]
    MissingCredentials,
    #[error("Please enter your email address")]
    VerificationEmailRequired,
    #[error("Please enter your email address first")]
    ResendEmailRequired,
    #[error("Please enter the verification code")]
    VerificationCodeRequired,
    #[error("Please fill in all required fields")]
    MissingCheckoutDetails,
    #[error("New passwords do not match")]
    NewPasswordMismatch,
    #[error("Please select a rating")]
    RatingRequired,
}

impl FormError {
    /// Notification heading for this error.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::NameRequired
            | Self::EmailRequired
            | Self::InvalidEmail
            | Self::PhoneRequired
            | Self::PhoneCountryCode
            | Self::PasswordTooShort
            | Self::MissingCredentials => "Validation Error",
            Self::PasswordMismatch | Self::NewPasswordMismatch => "Password mismatch",
            Self::VerificationEmailRequired | Self::ResendEmailRequired => "Email required",
            Self::VerificationCodeRequired => "Verification code required",
            Self::MissingCheckoutDetails => "Missing information",
            Self::RatingRequired => "Rating required",
        }
    }
}

/// Registration request body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub phone_number: PhoneNumber,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Validate the registration form.
///
/// The name and phone number are trimmed; the email is trimmed and
/// lowercased.
///
/// # Errors
///
/// Returns the first failing check, in form order.
pub fn registration(
    name: &str,
    email: &str,
    phone_number: &str,
    password: &str,
    confirm_password: &str,
) -> Result<NewAccount, FormError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormError::NameRequired);
    }
    if email.trim().is_empty() {
        return Err(FormError::EmailRequired);
    }
    let email = Email::normalized(email).map_err(|_| FormError::InvalidEmail)?;
    if phone_number.trim().is_empty() {
        return Err(FormError::PhoneRequired);
    }
    let phone_number = PhoneNumber::parse(phone_number).map_err(|_| FormError::PhoneCountryCode)?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FormError::PasswordTooShort);
    }
    if password != confirm_password {
        return Err(FormError::PasswordMismatch);
    }

    Ok(NewAccount {
        name: name.to_owned(),
        email,
        password: password.to_owned(),
        phone_number,
    })
}

/// Login request body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Validate the login form. The email is trimmed but not otherwise checked.
///
/// # Errors
///
/// Returns [`FormError::MissingCredentials`] if either field is blank.
pub fn login(email: &str, password: &str) -> Result<Credentials, FormError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(FormError::MissingCredentials);
    }
    Ok(Credentials {
        email: email.to_owned(),
        password: password.to_owned(),
    })
}

/// Email verification request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub email: String,
    pub verification_code: String,
}

/// Validate the verification form.
///
/// # Errors
///
/// Returns an error if the email or the code is blank.
pub fn verification(email: &str, code: &str) -> Result<Verification, FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::VerificationEmailRequired);
    }
    let code = code.trim();
    if code.is_empty() {
        return Err(FormError::VerificationCodeRequired);
    }
    Ok(Verification {
        email: email.to_owned(),
        verification_code: code.to_owned(),
    })
}

/// Validate the email used to request a new verification code.
///
/// # Errors
///
/// Returns [`FormError::ResendEmailRequired`] if the email is blank.
pub fn resend_email(email: &str) -> Result<String, FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::ResendEmailRequired);
    }
    Ok(email.to_owned())
}

/// Checkout request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub whatsapp_number: String,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_notes: Option<String>,
}

/// Validate the checkout form. Notes are optional.
///
/// # Errors
///
/// Returns [`FormError::MissingCheckoutDetails`] if the WhatsApp number or
/// delivery address is blank.
pub fn checkout(
    whatsapp_number: &str,
    delivery_address: &str,
    customer_notes: &str,
) -> Result<CheckoutDetails, FormError> {
    let whatsapp_number = whatsapp_number.trim();
    let delivery_address = delivery_address.trim();
    if whatsapp_number.is_empty() || delivery_address.is_empty() {
        return Err(FormError::MissingCheckoutDetails);
    }
    let notes = customer_notes.trim();
    Ok(CheckoutDetails {
        whatsapp_number: whatsapp_number.to_owned(),
        delivery_address: delivery_address.to_owned(),
        customer_notes: (!notes.is_empty()).then(|| notes.to_owned()),
    })
}

/// Password change request body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

/// Validate the password change form.
///
/// # Errors
///
/// Returns [`FormError::NewPasswordMismatch`] if the new password and its
/// confirmation differ.
pub fn password_change(
    current_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<PasswordChange, FormError> {
    if new_password != confirm_password {
        return Err(FormError::NewPasswordMismatch);
    }
    Ok(PasswordChange {
        current_password: current_password.to_owned(),
        new_password: new_password.to_owned(),
        confirm_password: confirm_password.to_owned(),
    })
}

/// Validate the star selection of the rating widget. No selection, zero, and
/// out-of-range values all count as "not selected".
///
/// # Errors
///
/// Returns [`FormError::RatingRequired`] unless a 1-5 star value was chosen.
pub fn rating(stars: Option<u8>) -> Result<Stars, FormError> {
    stars
        .and_then(|value| Stars::new(value).ok())
        .ok_or(FormError::RatingRequired)
}

/// Clamp a requested quantity to `1..=stock`. Out-of-stock items still allow
/// a quantity of one; the backend has the final say.
#[must_use]
pub fn clamp_quantity(requested: i64, stock: i64) -> u32 {
    let upper = stock.clamp(1, i64::from(u32::MAX));
    u32::try_from(requested.clamp(1, upper)).unwrap_or(u32::MAX)
}
