//! The authenticated API client.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use lanyard_contract::{
    Account, CollectionData, CreateAccountRequest, CreateCollectionDataRequest, CreatedAccount,
    FindQuery, LocalLoginRequest, ObjectId, PaginatedData, TokenResponse, UpdateAccountRequest,
    UpdateCollectionDataRequest, User, account, auth as auth_contract, collection_data, user,
};

use crate::auth::{AccessToken, Credentials, RefreshGate, TokenStore};
use crate::error::{AuthError, Error};
use crate::http::{ApiRequest, ApiResponse, HttpClient};
use crate::registry::ClientConfig;

/// A client for the admin API with automatic token refresh.
///
/// Every authenticated request flows through [`send`](Self::send): the
/// current access token is injected as a bearer header, a 401 response
/// triggers one coordinated refresh episode, and the request is retried
/// exactly once. A second 401 clears the session.
///
/// # Thread Safety
///
/// Clients are cheap to clone (they use an internal `Arc`) and safe to share
/// across tasks. Each client owns one refresh gate, so the "exactly one
/// refresh call per episode" guarantee is scoped to the client instance —
/// use the [`ClientRegistry`](crate::ClientRegistry) to make sure equivalent
/// configurations share one instance.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    store: TokenStore,
    gate: RefreshGate,
    /// Cached current-user identity, populated at login and by
    /// [`ApiClient::fetch_self`], emptied by session clear.
    user: RwLock<Option<User>>,
}

impl ApiClient {
    /// Create a client with a fresh, empty token store.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Self::with_store(config, TokenStore::new())
    }

    /// Create a client around an existing token store.
    ///
    /// Passing the store explicitly keeps session state out of globals: the
    /// same store can be handed to whatever code seeds it at login, and
    /// tests can inspect it directly.
    pub fn with_store(config: &ClientConfig, store: TokenStore) -> Result<Self, Error> {
        let http = HttpClient::with_options(
            config.base_url().clone(),
            config.header_map()?,
            config.timeout_value(),
        )?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                store,
                gate: RefreshGate::new(),
                user: RwLock::new(None),
            }),
        })
    }

    /// Returns the token store backing this client.
    pub fn token_store(&self) -> &TokenStore {
        &self.inner.store
    }

    // ========================================================================
    // Authenticated Request Pipeline
    // ========================================================================

    /// Send a request with the current access token, refreshing on 401.
    ///
    /// The response is returned as-is, 401s included; this method never
    /// synthesizes an error for a status code. Transport failures propagate
    /// at whichever step they occur and never clear the session.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let token = self.inner.store.get().await;
        let response = self.inner.http.execute_authed(&request, &token).await?;

        // Only 401 engages the refresh protocol
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!("received 401, entering refresh protocol");

        // Don't race ahead of a refresh a sibling request already started.
        // A caller that had to wait here rode on that refresh and must not
        // claim the gate itself, or each released waiter would refresh in
        // turn.
        let waited = self.inner.gate.await_idle().await;

        if !waited && self.inner.gate.try_enter() {
            let outcome = self.refresh_access_token().await;
            self.inner.gate.exit();

            if let Err(error) = outcome {
                // The store is untouched; the retry below will carry the old
                // token and its 401 surfaces through the normal path
                warn!(%error, "token refresh failed");
            }
        }

        // Covers the caller whose try_enter raced with a leader that had
        // just entered; after this the refresh episode has fully completed
        self.inner.gate.await_idle().await;

        let token = self.inner.store.get().await;
        let retry = self.inner.http.execute_authed(&request, &token).await?;

        if retry.status() == StatusCode::UNAUTHORIZED {
            info!("retry still unauthorized, clearing session");
            self.clear_session().await;
        }

        Ok(retry)
    }

    /// Exchange the refresh credential (cookie) for a new access token.
    ///
    /// On success the store is updated; on any failure it is left untouched.
    /// Not retried here: the wrapper decides what happens next.
    async fn refresh_access_token(&self) -> Result<(), Error> {
        let request = ApiRequest::get(auth_contract::REFRESH_PATH);
        let response = self.inner.http.execute(&request).await?;

        if !response.is_success() {
            return Err(AuthError::RefreshRejected {
                status: response.status().as_u16(),
            }
            .into());
        }

        let body: TokenResponse = response.json()?;
        self.inner.store.set(AccessToken::new(body.access_token)).await;

        debug!("access token refreshed");
        Ok(())
    }

    // ========================================================================
    // Session Operations
    // ========================================================================

    /// Authenticate with username and password.
    ///
    /// On success the token store is seeded, the refresh cookie is absorbed
    /// by the transport, and the current user is fetched and cached.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the backend rejects the
    /// credentials.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User, Error> {
        info!("logging in");

        let body = LocalLoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        };
        let request = ApiRequest::post(auth_contract::LOGIN_PATH).json(&body)?;
        let response = self.inner.http.execute(&request).await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AuthError::InvalidCredentials.into());
            }
            _ => return Err(response.to_api_error().into()),
        }

        let token: TokenResponse = response.json()?;
        self.inner.store.set(AccessToken::new(token.access_token)).await;

        self.fetch_self().await
    }

    /// Log out: invalidate the refresh credential server-side, then clear
    /// the session. A failed logout call leaves the session intact.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), Error> {
        let response = self.send(ApiRequest::delete(auth_contract::LOGOUT_PATH)).await?;

        if !response.is_success() {
            return Err(response.to_api_error().into());
        }

        self.clear_session().await;
        info!("logged out");
        Ok(())
    }

    /// Clear the session: empty the token store and drop the cached user.
    ///
    /// Idempotent and infallible; safe to call when already cleared. Does
    /// not contact the backend.
    pub async fn clear_session(&self) {
        self.inner.store.clear().await;
        self.inner.user.write().await.take();
    }

    /// Returns the cached current user, if a session is active.
    pub async fn current_user(&self) -> Option<User> {
        self.inner.user.read().await.clone()
    }

    /// Fetch the current user from the backend and cache it.
    pub async fn fetch_self(&self) -> Result<User, Error> {
        let fetched: User = self.send_json(ApiRequest::get(user::GET_SELF_PATH)).await?;
        *self.inner.user.write().await = Some(fetched.clone());
        Ok(fetched)
    }

    // ========================================================================
    // Account Operations
    // ========================================================================

    /// Create an account.
    pub async fn create_account(
        &self,
        request: &CreateAccountRequest<'_>,
    ) -> Result<CreatedAccount, Error> {
        self.send_json(ApiRequest::post(account::ACCOUNTS_PATH).json(request)?)
            .await
    }

    /// List accounts, paginated and optionally filtered by keyword.
    pub async fn find_accounts(&self, query: &FindQuery) -> Result<PaginatedData<Account>, Error> {
        self.send_json(ApiRequest::get(account::ACCOUNTS_PATH).query(query)?)
            .await
    }

    /// Fetch a single account.
    pub async fn get_account(&self, id: &ObjectId) -> Result<Account, Error> {
        self.send_json(ApiRequest::get(account::account_path(id))).await
    }

    /// Update an account. Unset fields are left unchanged.
    pub async fn update_account(
        &self,
        id: &ObjectId,
        request: &UpdateAccountRequest<'_>,
    ) -> Result<Account, Error> {
        self.send_json(ApiRequest::patch(account::account_path(id)).json(request)?)
            .await
    }

    /// Remove an account.
    pub async fn remove_account(&self, id: &ObjectId) -> Result<(), Error> {
        self.send_no_content(ApiRequest::delete(account::account_path(id)))
            .await
    }

    // ========================================================================
    // Collection-Data Operations
    // ========================================================================

    /// Create a collection-data entry.
    pub async fn create_collection_data(
        &self,
        request: &CreateCollectionDataRequest<'_>,
    ) -> Result<CollectionData, Error> {
        self.send_json(
            ApiRequest::post(collection_data::COLLECTION_DATA_PATH).json(request)?,
        )
        .await
    }

    /// List collection-data entries, paginated.
    pub async fn find_collection_data(
        &self,
        query: &FindQuery,
    ) -> Result<PaginatedData<CollectionData>, Error> {
        self.send_json(
            ApiRequest::get(collection_data::COLLECTION_DATA_PATH).query(query)?,
        )
        .await
    }

    /// Fetch a single collection-data entry.
    pub async fn get_collection_data(&self, id: &ObjectId) -> Result<CollectionData, Error> {
        self.send_json(ApiRequest::get(collection_data::collection_data_path(id)))
            .await
    }

    /// Update a collection-data entry.
    pub async fn update_collection_data(
        &self,
        id: &ObjectId,
        request: &UpdateCollectionDataRequest<'_>,
    ) -> Result<CollectionData, Error> {
        self.send_json(
            ApiRequest::patch(collection_data::collection_data_path(id)).json(request)?,
        )
        .await
    }

    /// Remove a collection-data entry.
    pub async fn remove_collection_data(&self, id: &ObjectId) -> Result<(), Error> {
        self.send_no_content(ApiRequest::delete(collection_data::collection_data_path(id)))
            .await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Send through the wrapper and decode a 2xx JSON body, converting any
    /// other status into an error.
    async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(response.to_api_error().into());
        }
        response.json()
    }

    /// Send through the wrapper expecting a bodyless 2xx response.
    async fn send_no_content(&self, request: ApiRequest) -> Result<(), Error> {
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(response.to_api_error().into());
        }
        Ok(())
    }
}

// Custom Debug impl that hides session state
impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", self.inner.http.base_url())
            .field("session", &"[REDACTED]")
            .finish()
    }
}
