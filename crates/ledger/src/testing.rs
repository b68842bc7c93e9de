//! In-memory `InstrumentStore` used by this crate's tests and by downstream
//! crates that exercise ledger-driven flows without a database.

use crate::error::LedgerError;
use crate::store::InstrumentStore;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Instrument, NewInstrument};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Instrument>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Snapshot of the current table contents.
    pub fn rows(&self) -> Vec<Instrument> {
        self.rows.lock().expect("store lock poisoned").clone()
    }
}

#[async_trait]
impl InstrumentStore for MemoryStore {
    async fn insert(&self, new: NewInstrument) -> Result<Instrument, LedgerError> {
        let mut rows = self.rows.lock().expect("store lock poisoned");
        if rows.iter().any(|i| i.symbol == new.symbol) {
            return Err(LedgerError::DuplicateSymbol(new.symbol));
        }
        let instrument = Instrument {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            symbol: new.symbol,
            name: new.name,
            quantity: new.quantity,
            buy_price: new.buy_price,
            current_price: None,
            created_at: Utc::now(),
        };
        rows.push(instrument.clone());
        Ok(instrument)
    }

    async fn fetch(&self, id: i64) -> Result<Instrument, LedgerError> {
        self.rows()
            .into_iter()
            .find(|i| i.id == id)
            .ok_or_else(|| LedgerError::id_not_found(id))
    }

    async fn fetch_by_symbol(&self, symbol: &str) -> Result<Instrument, LedgerError> {
        self.rows()
            .into_iter()
            .find(|i| i.symbol == symbol)
            .ok_or_else(|| LedgerError::symbol_not_found(symbol))
    }

    async fn update(&self, instrument: &Instrument) -> Result<(), LedgerError> {
        let mut rows = self.rows.lock().expect("store lock poisoned");
        match rows.iter_mut().find(|i| i.id == instrument.id) {
            Some(row) => {
                *row = instrument.clone();
                Ok(())
            }
            None => Err(LedgerError::id_not_found(instrument.id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), LedgerError> {
        let mut rows = self.rows.lock().expect("store lock poisoned");
        let before = rows.len();
        rows.retain(|i| i.id != id);
        if rows.len() == before {
            return Err(LedgerError::id_not_found(id));
        }
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Instrument>, LedgerError> {
        Ok(self.rows())
    }
}
