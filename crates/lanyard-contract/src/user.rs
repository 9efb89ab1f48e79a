//! Current-user contract.

use crate::account::Account;

/// GET: fetch the account behind the current access token.
pub const GET_SELF_PATH: &str = "/api/v1/user/self";

/// The current user.
///
/// Today this is the account record verbatim; user-specific fields would be
/// layered on here if the backend ever extends the self endpoint.
pub type User = Account;
