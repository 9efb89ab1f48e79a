//! Authentication contract: login, token refresh and logout.

use serde::{Deserialize, Serialize};

/// POST: authenticate with a local username/password pair.
pub const LOGIN_PATH: &str = "/api/v1/auth/local";

/// GET: exchange the refresh credential (HTTP-only cookie) for a new
/// access token. The cookie is scoped to this path by the backend.
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

/// DELETE: invalidate the refresh credential and end the session.
pub const LOGOUT_PATH: &str = "/api/v1/auth";

/// Request body for local login.
#[derive(Debug, Serialize)]
pub struct LocalLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from login and refresh.
///
/// The refresh credential is deliberately absent: it travels only as an
/// HTTP-only cookie and is never readable by client code.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}
