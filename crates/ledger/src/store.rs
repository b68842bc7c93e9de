use crate::error::LedgerError;
use async_trait::async_trait;
use core_types::{Instrument, NewInstrument};

/// The authoritative store behind the instrument ledger.
///
/// Every operation is a single atomic commit; implementations map their
/// uniqueness and row-not-found conditions onto `DuplicateSymbol` and
/// `NotFound` so the ledger logic stays store-agnostic.
#[async_trait]
pub trait InstrumentStore: Send + Sync {
    /// Inserts a new instrument and returns the stored record with its
    /// generated id and timestamp.
    async fn insert(&self, new: NewInstrument) -> Result<Instrument, LedgerError>;

    async fn fetch(&self, id: i64) -> Result<Instrument, LedgerError>;

    async fn fetch_by_symbol(&self, symbol: &str) -> Result<Instrument, LedgerError>;

    /// Persists the full state of an existing instrument in one commit.
    async fn update(&self, instrument: &Instrument) -> Result<(), LedgerError>;

    async fn delete(&self, id: i64) -> Result<(), LedgerError>;

    async fn fetch_all(&self) -> Result<Vec<Instrument>, LedgerError>;
}
