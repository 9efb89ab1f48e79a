//! Common schema types shared by every resource contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ContractError;

/// A validated document id: exactly 24 lowercase hex characters.
///
/// The backend's document store issues ids in this format; the contract
/// validates them client-side so malformed ids never reach the wire.
///
/// # Example
///
/// ```
/// use lanyard_contract::ObjectId;
///
/// let id = ObjectId::new("65a1b2c3d4e5f6a7b8c9d0e1").unwrap();
/// assert_eq!(id.as_str(), "65a1b2c3d4e5f6a7b8c9d0e1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Create a new object id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not 24 lowercase hex characters.
    pub fn new(s: impl AsRef<str>) -> Result<Self, ContractError> {
        let s = s.as_ref();

        if s.len() != 24 {
            return Err(ContractError::ObjectId {
                value: s.to_string(),
                reason: "must be exactly 24 characters".to_string(),
            });
        }

        if !s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) {
            return Err(ContractError::ObjectId {
                value: s.to_string(),
                reason: "must contain only lowercase hex characters".to_string(),
            });
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectId::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Basic error message body returned by the backend on 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// Page-based paginated data wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedData<T> {
    pub skip: u64,
    pub limit: u64,
    pub total: u64,
    pub data: Vec<T>,
}

/// Common listing query parameters.
///
/// Fields left as `None` are omitted from the query string so the backend
/// applies its own defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FindQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}
