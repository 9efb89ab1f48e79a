//! Error types for contract validation.

use thiserror::Error;

/// Validation errors raised while constructing contract types.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Invalid object id format.
    #[error("invalid object id '{value}': {reason}")]
    ObjectId { value: String, reason: String },
}
