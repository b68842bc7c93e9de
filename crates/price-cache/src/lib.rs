use core_types::Instrument;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// A flat, string-keyed snapshot of one instrument, as stored in the cache.
pub type Snapshot = HashMap<String, String>;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("The cache store rejected the operation: {0}")]
    Backend(String),
}

/// The read-through side-store mirroring the latest known attributes of each
/// tracked instrument, keyed by instrument id.
///
/// The ledger drives every write synchronously after its own commits; cache
/// failures are logged and swallowed there, never surfaced to callers.
pub trait InstrumentCache: Send + Sync {
    /// Overwrites the full snapshot for an instrument.
    fn put(&self, instrument: &Instrument) -> Result<(), CacheError>;

    /// Removes the cache entry for an instrument, if present.
    fn remove(&self, id: i64) -> Result<(), CacheError>;

    /// Reads the cached snapshot for an instrument.
    fn get(&self, id: i64) -> Option<Snapshot>;
}

/// Flattens an instrument into the string-keyed form the cache stores.
pub fn snapshot_of(instrument: &Instrument) -> Snapshot {
    let mut map = Snapshot::new();
    map.insert("id".to_string(), instrument.id.to_string());
    map.insert("symbol".to_string(), instrument.symbol.clone());
    map.insert("name".to_string(), instrument.name.clone());
    map.insert("quantity".to_string(), instrument.quantity.to_string());
    map.insert("buy_price".to_string(), instrument.buy_price.to_string());
    map.insert(
        "current_price".to_string(),
        match instrument.current_price {
            Some(price) => price.to_string(),
            None => "null".to_string(),
        },
    );
    map.insert("created_at".to_string(), instrument.created_at.to_rfc3339());
    map
}

/// An in-process hash-map implementation of `InstrumentCache`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<i64, Snapshot>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InstrumentCache for MemoryCache {
    fn put(&self, instrument: &Instrument) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        entries.insert(instrument.id, snapshot_of(instrument));
        Ok(())
    }

    fn remove(&self, id: i64) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        entries.remove(&id);
        Ok(())
    }

    fn get(&self, id: i64) -> Option<Snapshot> {
        self.entries.read().ok()?.get(&id).cloned()
    }
}
