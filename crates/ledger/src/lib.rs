//! # Instrument Ledger
//!
//! The authoritative, shared record of tracked instruments backing the
//! cross-user leaderboard. The ledger owns its authoritative store (behind
//! the `InstrumentStore` trait) and drives the price cache synchronously
//! from its write path: every successful write refreshes the corresponding
//! cache entry, and a tracked quantity of zero removes it.

pub mod error;
pub mod ledger;
pub mod store;
pub mod testing;

// Re-export the key components to create a clean, public-facing API.
pub use error::LedgerError;
pub use ledger::InstrumentLedger;
pub use store::InstrumentStore;
