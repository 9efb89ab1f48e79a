//! Request descriptor and buffered response types.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use lanyard_contract::ErrorMessage;

use crate::error::{ApiError, Error, InvalidInputError};

/// An outbound request descriptor: method, path, query, headers, JSON body.
///
/// The descriptor is inert data, so the request wrapper can issue it, observe
/// a 401, and re-issue the identical request after a refresh episode. Only
/// the `Authorization` header differs between the two attempts, and that is
/// injected by the client, overwriting any caller-supplied value.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Option<serde_json::Value>,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Create a request descriptor for an endpoint path (starting with `/`).
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Shorthand for a PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Shorthand for a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach query parameters.
    pub fn query<Q: Serialize>(mut self, params: &Q) -> Result<Self, Error> {
        self.query = Some(serde_json::to_value(params)?);
        Ok(self)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a header. A caller-supplied `Authorization` header is
    /// overwritten by the client when the request is sent.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            InvalidInputError::Header {
                name: name.to_string(),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|_| InvalidInputError::Header {
            name: name.to_string(),
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Returns the request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the endpoint path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn query_value(&self) -> Option<&serde_json::Value> {
        self.query.as_ref()
    }

    pub(crate) fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn body_value(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// A fully buffered response: status plus body bytes.
///
/// The request wrapper hands responses back as-is, 401s included; callers
/// inspect the status themselves or go through the typed operations, which
/// convert non-success statuses into [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self, Error> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(Self { status, body })
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The server's error message, if the body carries one.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_slice::<ErrorMessage>(&self.body)
            .ok()
            .map(|e| e.message)
    }

    /// Convert a non-success response into an [`ApiError`].
    pub fn to_api_error(&self) -> ApiError {
        ApiError::new(self.status.as_u16(), self.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_headers_are_collected() {
        let request = ApiRequest::get("/api/v1/user/self")
            .header("x-request-id", "abc123")
            .unwrap();
        assert_eq!(
            request.headers().get("x-request-id").unwrap(),
            &HeaderValue::from_static("abc123")
        );
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        assert!(ApiRequest::get("/x").header("bad header", "v").is_err());
    }

    #[test]
    fn error_message_parses_backend_body() {
        let response = ApiResponse {
            status: StatusCode::BAD_REQUEST,
            body: br#"{"message":"username-duplicate"}"#.to_vec(),
        };
        assert_eq!(
            response.error_message().as_deref(),
            Some("username-duplicate")
        );
        assert_eq!(response.to_api_error().status, 400);
    }

    #[test]
    fn error_message_tolerates_empty_body() {
        let response = ApiResponse {
            status: StatusCode::FORBIDDEN,
            body: Vec::new(),
        };
        assert!(response.error_message().is_none());
        assert!(response.to_api_error().is_auth_error());
    }
}
