//! Authentication primitives: credentials, the access token, the in-memory
//! token store, and the single-flight refresh gate.

mod credentials;
mod gate;
mod store;
mod token;

pub use credentials::Credentials;
pub use gate::RefreshGate;
pub use store::TokenStore;
pub use token::AccessToken;
