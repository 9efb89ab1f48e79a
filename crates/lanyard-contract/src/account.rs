//! Account resource contract.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::ObjectId;

/// Collection path for accounts. POST creates, GET lists (paginated).
pub const ACCOUNTS_PATH: &str = "/api/v1/accounts";

/// Item path for a single account. GET fetches, PATCH updates, DELETE removes.
pub fn account_path(id: &ObjectId) -> String {
    format!("{}/{}", ACCOUNTS_PATH, id)
}

/// Role assigned to an account, controlling which resources it may manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// May manage all resource data.
    Admin,
    /// May only read and export data.
    Basic,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRole::Admin => write!(f, "admin"),
            AccountRole::Basic => write!(f, "basic"),
        }
    }
}

/// An account as returned by the backend. Password and refresh-token fields
/// never appear in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: ObjectId,
    pub role: AccountRole,
    pub username: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for creating an account.
#[derive(Debug, Serialize)]
pub struct CreateAccountRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// Response body from account creation.
#[derive(Debug, Deserialize)]
pub struct CreatedAccount {
    pub id: String,
}

/// Request body for updating an account. Unset fields are left unchanged.
#[derive(Debug, Default, Serialize)]
pub struct UpdateAccountRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_lowercase_wire_format() {
        assert_eq!(serde_json::to_string(&AccountRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&AccountRole::Basic).unwrap(), "\"basic\"");
    }

    #[test]
    fn account_deserializes_without_description() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "id": "65a1b2c3d4e5f6a7b8c9d0e1",
            "role": "admin",
            "username": "alice",
            "name": "Alice"
        }))
        .unwrap();

        assert_eq!(account.role, AccountRole::Admin);
        assert!(account.description.is_none());
    }

    #[test]
    fn item_path_includes_id() {
        let id = ObjectId::new("65a1b2c3d4e5f6a7b8c9d0e1").unwrap();
        assert_eq!(
            account_path(&id),
            "/api/v1/accounts/65a1b2c3d4e5f6a7b8c9d0e1"
        );
    }
}
