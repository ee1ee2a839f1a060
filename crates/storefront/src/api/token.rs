//! Persisted session token.
//!
//! The bearer token issued at login is the single source of truth for
//! whether a shopper is signed in. [`TokenStore`] abstracts where it lives:
//! the shopper's tower-sessions session in production, plain memory in tests.

use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tower_sessions::Session;

use crate::models::session_keys;

/// Errors reading or writing the persisted token.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    /// The session backend failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// An opaque bearer credential.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Storage for the shopper's session token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    fn load(&self) -> impl Future<Output = Result<Option<SessionToken>, TokenStoreError>> + Send;

    /// Persist a token, replacing any previous one.
    fn store(&self, token: SessionToken) -> impl Future<Output = Result<(), TokenStoreError>> + Send;

    /// Remove the persisted token.
    fn clear(&self) -> impl Future<Output = Result<(), TokenStoreError>> + Send;
}

/// Token store backed by the shopper's session.
#[derive(Clone)]
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    /// Create a store over a session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl TokenStore for SessionTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>, TokenStoreError> {
        let token = self.session.get::<String>(session_keys::TOKEN).await?;
        Ok(token.map(SessionToken::new))
    }

    async fn store(&self, token: SessionToken) -> Result<(), TokenStoreError> {
        self.session
            .insert(session_keys::TOKEN, token.expose())
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        self.session.remove::<String>(session_keys::TOKEN).await?;
        Ok(())
    }
}

/// In-memory token store. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<RwLock<Option<SessionToken>>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(SessionToken::new(token)))),
        }
    }

    /// Raw token currently held, if any.
    pub async fn current(&self) -> Option<String> {
        self.slot
            .read()
            .await
            .as_ref()
            .map(|token| token.expose().to_string())
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>, TokenStoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn store(&self, token: SessionToken) -> Result<(), TokenStoreError> {
        *self.slot.write().await = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_lifecycle() {
        let store = MemoryTokenStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.store(SessionToken::new("abc")).await.unwrap();
        let shared = store.clone();
        assert_eq!(shared.current().await.as_deref(), Some("abc"));

        shared.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
