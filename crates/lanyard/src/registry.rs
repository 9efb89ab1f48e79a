//! Client configuration and the memoized client registry.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::{Error, InvalidInputError};
use crate::types::BaseUrl;

/// Configuration for an [`ApiClient`].
///
/// Base headers live in a `BTreeMap`, so two configurations that set the
/// same headers in different orders are equal and canonicalize to the same
/// [`cache_key`](Self::cache_key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: BaseUrl,
    base_headers: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            base_headers: BTreeMap::new(),
            timeout: None,
        }
    }

    /// Add a header sent with every request.
    pub fn base_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_headers.insert(name.into(), value.into());
        self
    }

    /// Set a request timeout applied to every call, refresh included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub(crate) fn timeout_value(&self) -> Option<Duration> {
        self.timeout
    }

    /// Deterministic cache key: identical fields always produce the same
    /// key, regardless of the order headers were added in.
    pub fn cache_key(&self) -> String {
        let mut key = format!("url={}", self.base_url);
        for (name, value) in &self.base_headers {
            key.push_str(";header=");
            key.push_str(name);
            key.push('=');
            key.push_str(value);
        }
        if let Some(timeout) = self.timeout {
            key.push_str(&format!(";timeout_ms={}", timeout.as_millis()));
        }
        key
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.base_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                InvalidInputError::Header { name: name.clone() }
            })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| InvalidInputError::Header { name: name.clone() })?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}

/// A registry mapping canonicalized configurations to shared client
/// instances.
///
/// Repeatedly constructing clients for the same configuration would hand out
/// disconnected token stores and refresh gates (and leak connection pools);
/// the registry guarantees one instance per distinct configuration, so every
/// caller with an equivalent config shares one session.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<String, ApiClient>>,
}

impl ClientRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the client for this configuration, constructing it on first
    /// use. Equal configurations always yield the same instance.
    pub async fn get_or_create(&self, config: &ClientConfig) -> Result<ApiClient, Error> {
        let mut clients = self.clients.lock().await;

        let key = config.cache_key();
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        debug!(key = %key, "constructing new client");
        let client = ApiClient::new(config)?;
        clients.insert(key, client.clone());
        Ok(client)
    }

    /// Number of distinct clients currently cached.
    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Returns true if no clients have been constructed yet.
    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AccessToken;

    fn base_url() -> BaseUrl {
        BaseUrl::new("https://admin.example.com").unwrap()
    }

    #[test]
    fn cache_key_is_order_independent() {
        let a = ClientConfig::new(base_url())
            .base_header("x-tenant", "acme")
            .base_header("x-trace", "on");
        let b = ClientConfig::new(base_url())
            .base_header("x-trace", "on")
            .base_header("x-tenant", "acme");

        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn cache_key_distinguishes_configs() {
        let plain = ClientConfig::new(base_url());
        let with_header = ClientConfig::new(base_url()).base_header("x-tenant", "acme");
        let with_timeout = ClientConfig::new(base_url()).timeout(Duration::from_secs(5));

        assert_ne!(plain.cache_key(), with_header.cache_key());
        assert_ne!(plain.cache_key(), with_timeout.cache_key());
        assert_ne!(with_header.cache_key(), with_timeout.cache_key());
    }

    #[tokio::test]
    async fn same_config_yields_same_instance() {
        let registry = ClientRegistry::new();

        let a = ClientConfig::new(base_url())
            .base_header("a", "1")
            .base_header("b", "2");
        let b = ClientConfig::new(base_url())
            .base_header("b", "2")
            .base_header("a", "1");

        let client_a = registry.get_or_create(&a).await.unwrap();
        let client_b = registry.get_or_create(&b).await.unwrap();
        assert_eq!(registry.len().await, 1);

        // Shared instance: a token set through one handle is visible
        // through the other
        client_a.token_store().set(AccessToken::new("t1")).await;
        assert_eq!(client_b.token_store().get().await.as_str(), "t1");
    }

    #[tokio::test]
    async fn different_config_yields_different_instance() {
        let registry = ClientRegistry::new();

        let plain = ClientConfig::new(base_url());
        let custom = ClientConfig::new(base_url()).base_header("x-tenant", "acme");

        let client_a = registry.get_or_create(&plain).await.unwrap();
        let client_b = registry.get_or_create(&custom).await.unwrap();
        assert_eq!(registry.len().await, 2);

        client_a.token_store().set(AccessToken::new("t1")).await;
        assert!(client_b.token_store().get().await.is_empty());
    }
}
