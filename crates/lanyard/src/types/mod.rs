//! Validated value types used across the client.

mod base_url;

pub use base_url::BaseUrl;
