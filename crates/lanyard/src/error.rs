//! Error types for the lanyard library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for lanyard operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (invalid credentials, rejected refresh).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// API errors (non-success responses from the backend).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (invalid base URL, header values).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Response body could not be decoded into the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials provided at login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The refresh endpoint rejected the refresh credential.
    #[error("token refresh rejected with status {status}")]
    RefreshRejected { status: u16 },
}

/// A non-success response from the backend, surfaced by typed operations.
///
/// The request wrapper itself never raises this: it hands responses back
/// as-is. Typed resource operations convert any status >= 400 into an
/// `ApiError` so callers get a `Result` instead of inspecting statuses.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server body, if present.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL format.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Header name or value is not representable on the wire.
    #[error("invalid header '{name}'")]
    Header { name: String },

    /// Access token contains characters not allowed in a header value.
    #[error("access token contains invalid header characters")]
    Token,
}
