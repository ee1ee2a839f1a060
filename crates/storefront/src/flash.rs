//! Flash notifications ("toasts").
//!
//! Mutating handlers follow Post/Redirect/Get: they push a [`Toast`] into the
//! session and redirect. The next rendered page takes and shows them.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    /// CSS modifier for the toast.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A one-shot notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    /// Optional call to action, e.g. the WhatsApp hand-off after checkout.
    #[serde(default)]
    pub link: Option<String>,
}

impl Toast {
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.into(),
            message: message.into(),
            link: None,
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            message: message.into(),
            link: None,
        }
    }

    /// Shown when an anonymous shopper uses an action that needs an account.
    #[must_use]
    pub fn login_required(action: &str) -> Self {
        Self::error("Authentication required", format!("Please login to {action}"))
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Queue a toast for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn push(session: &Session, toast: Toast) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<Toast> = session.get(session_keys::FLASH).await?.unwrap_or_default();
    pending.push(toast);
    session.insert(session_keys::FLASH, pending).await
}

/// Take all queued toasts.
///
/// A session failure only costs the notifications, so it is logged and
/// swallowed.
pub async fn take(session: &Session) -> Vec<Toast> {
    match session.remove::<Vec<Toast>>(session_keys::FLASH).await {
        Ok(toasts) => toasts.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash notifications");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_toasts_are_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push(&session, Toast::success("Cart cleared", "All items have been removed from your cart"))
            .await
            .unwrap();
        push(&session, Toast::login_required("add favorites")).await.unwrap();

        let toasts = take(&session).await;
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[1].title, "Authentication required");
        assert_eq!(toasts[1].message, "Please login to add favorites");
        assert_eq!(toasts[1].kind, ToastKind::Error);

        assert!(take(&session).await.is_empty());
    }
}
