//! Low-level HTTP plumbing: request descriptors, buffered responses, and the
//! reqwest-backed client that owns the cookie jar.

mod client;
mod request;

pub use client::HttpClient;
pub use request::{ApiRequest, ApiResponse};
