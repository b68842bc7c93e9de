//! # Database Crate
//!
//! The application's Postgres adapter. It encapsulates all SQL: connection
//! pooling, schema migrations, and the concrete implementations of the
//! store traits the ledger, portfolio and accounts components depend on.
//! Everything above this crate is store-agnostic.

pub mod connection;
pub mod error;
pub mod stores;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use stores::{PgAccountStore, PgInstrumentStore, PgPortfolioStore};
