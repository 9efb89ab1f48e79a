//! lanyard - Typed admin-API client with single-flight token refresh.
//!
//! This library wraps an admin REST backend behind a session-centric API.
//! All authenticated traffic flows through an [`ApiClient`], which injects
//! the current bearer token, coordinates a single refresh call across
//! concurrent 401 responses, retries the failed request exactly once, and
//! clears the session when the retry is rejected again.
//!
//! # Example
//!
//! ```no_run
//! use lanyard::{ApiClient, BaseUrl, ClientConfig, Credentials};
//!
//! # async fn example() -> Result<(), lanyard::Error> {
//! let base_url = BaseUrl::new("https://admin.example.com")?;
//! let client = ApiClient::new(&ClientConfig::new(base_url))?;
//!
//! let user = client.login(&Credentials::new("alice", "password")).await?;
//! println!("Logged in as: {}", user.username);
//!
//! let accounts = client.find_accounts(&Default::default()).await?;
//! println!("{} accounts total", accounts.total);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod registry;
pub mod types;

// Re-export primary types at crate root for convenience
pub use auth::{AccessToken, Credentials, RefreshGate, TokenStore};
pub use client::ApiClient;
pub use error::Error;
pub use http::{ApiRequest, ApiResponse, HttpClient};
pub use registry::{ClientConfig, ClientRegistry};
pub use types::BaseUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
