//! Access token type.

use std::fmt;

/// A short-lived bearer token authorizing API requests.
///
/// An empty token means "not authenticated"; requests still go out, carrying
/// an empty bearer value the backend rejects with 401. The refresh credential
/// has no counterpart type here: it lives in an HTTP-only cookie owned by the
/// transport and is never readable by client code.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The unauthenticated (empty) token.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns true if this token represents the unauthenticated state.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the token value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}
