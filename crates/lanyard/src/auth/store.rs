//! In-memory access token store.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::token::AccessToken;

/// Shared, in-memory store for the current access token.
///
/// The store is the single owner of the access token: the request wrapper
/// reads it, the login and refresh operations replace it, and session clear
/// empties it. Tokens are never written to durable storage.
///
/// Handles are cheap to clone (internal `Arc`); every clone observes the
/// same token, so a store can be shared between a client and the code that
/// seeds it at login.
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<AccessToken>>,
}

impl TokenStore {
    /// Create an empty store (unauthenticated state).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current token. Empty means "not authenticated".
    pub async fn get(&self) -> AccessToken {
        self.inner.read().await.clone()
    }

    /// Replace the current token. Immediately visible to all holders.
    pub async fn set(&self, token: AccessToken) {
        *self.inner.write().await = token;
    }

    /// Clear the current token, equivalent to setting the empty token.
    pub async fn clear(&self) {
        self.set(AccessToken::empty()).await;
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}
