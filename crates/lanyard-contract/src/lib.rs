//! lanyard-contract - Shared API contract for the lanyard admin client.
//!
//! This crate defines the request/response shapes and endpoint paths shared
//! between the admin backend and any client consuming it. It carries no HTTP
//! machinery: everything here is plain data plus validation.

pub mod account;
pub mod auth;
pub mod collection_data;
pub mod common;
pub mod error;
pub mod user;

pub use account::{Account, AccountRole, CreateAccountRequest, CreatedAccount, UpdateAccountRequest};
pub use auth::{LocalLoginRequest, TokenResponse};
pub use collection_data::{CollectionData, CreateCollectionDataRequest, UpdateCollectionDataRequest};
pub use common::{ErrorMessage, FindQuery, ObjectId, PaginatedData};
pub use error::ContractError;
pub use user::User;
