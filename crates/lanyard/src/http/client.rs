//! reqwest-backed HTTP client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, instrument, trace};

use crate::auth::AccessToken;
use crate::error::{Error, InvalidInputError};
use crate::types::BaseUrl;

use super::request::{ApiRequest, ApiResponse};

/// HTTP client for a single API base URL.
///
/// Owns the reqwest client and its cookie jar. The jar is where the refresh
/// credential lives: the backend sets it as an HTTP-only cookie at login and
/// rotates it on refresh, and this client attaches it automatically. Nothing
/// above this layer can read it.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: BaseUrl,
}

impl HttpClient {
    /// Create a new client for the given base URL.
    pub fn new(base: BaseUrl) -> Result<Self, Error> {
        Self::with_options(base, HeaderMap::new(), None)
    }

    /// Create a new client with default headers and an optional timeout.
    pub fn with_options(
        base: BaseUrl,
        default_headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("lanyard/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .default_headers(default_headers);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(Self { client, base })
    }

    /// Returns the base URL this client is configured for.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    /// Issue a request without an Authorization header.
    ///
    /// Used for login and for the token refresh call, where authentication
    /// rides in the cookie jar rather than a bearer token.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, Error> {
        debug!("request");
        self.execute_with_headers(request, request.headers().clone())
            .await
    }

    /// Issue a request carrying `Authorization: Bearer <token>`.
    ///
    /// Any caller-supplied Authorization header is overwritten.
    #[instrument(skip(self, request, token), fields(method = %request.method(), path = %request.path()))]
    pub async fn execute_authed(
        &self,
        request: &ApiRequest,
        token: &AccessToken,
    ) -> Result<ApiResponse, Error> {
        debug!("authenticated request");

        let mut headers = request.headers().clone();
        let bearer = format!("Bearer {}", token.as_str());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|_| InvalidInputError::Token)?,
        );

        self.execute_with_headers(request, headers).await
    }

    async fn execute_with_headers(
        &self,
        request: &ApiRequest,
        headers: HeaderMap,
    ) -> Result<ApiResponse, Error> {
        let url = self.base.endpoint_url(request.path());

        let mut builder = self
            .client
            .request(request.method().clone(), url)
            .headers(headers);

        if let Some(query) = request.query_value() {
            builder = builder.query(query);
        }

        if let Some(body) = request.body_value() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        trace!(status = %response.status(), "response");

        ApiResponse::from_reqwest(response).await
    }
}
