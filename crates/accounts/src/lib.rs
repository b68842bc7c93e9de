//! # Accounts
//!
//! User registration, credential checking and stateless session tokens.
//! Passwords are stored as salted bcrypt hashes; sessions are HS256 JWTs
//! carrying the user id.

pub mod error;
pub mod service;
pub mod store;
pub mod testing;
pub mod token;

// Re-export the key components to create a clean, public-facing API.
pub use error::AccountError;
pub use service::AccountService;
pub use store::AccountStore;
pub use token::TokenIssuer;
