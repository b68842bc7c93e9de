use crate::error::LedgerError;
use crate::store::InstrumentStore;
use core_types::{Instrument, InstrumentUpdate, LeaderboardEntry, NewInstrument, SortKey};
use price_cache::InstrumentCache;
use std::sync::Arc;

/// The authoritative record of tracked instruments, plus the synchronous
/// price-cache mirror driven from its write path.
pub struct InstrumentLedger {
    store: Arc<dyn InstrumentStore>,
    cache: Arc<dyn InstrumentCache>,
}

impl InstrumentLedger {
    pub fn new(store: Arc<dyn InstrumentStore>, cache: Arc<dyn InstrumentCache>) -> Self {
        Self { store, cache }
    }

    /// Adds a new instrument to the ledger and populates its cache entry.
    /// The symbol is case-normalized before it is stored.
    pub async fn add_instrument(&self, mut new: NewInstrument) -> Result<Instrument, LedgerError> {
        if new.quantity <= 0 || new.buy_price <= 0.0 {
            return Err(LedgerError::InvalidInput(
                "Quantity and buy price must be positive numbers.".to_string(),
            ));
        }
        new.symbol = new.symbol.to_uppercase();

        let instrument = self.store.insert(new).await?;
        tracing::info!(
            symbol = %instrument.symbol,
            name = %instrument.name,
            "instrument added to the ledger"
        );
        self.sync_cache(&instrument);
        Ok(instrument)
    }

    /// Applies a set of field updates atomically, then refreshes the cache.
    ///
    /// A resulting quantity of zero removes the cache entry instead of
    /// updating it, even when the update itself touched other fields.
    pub async fn update_instrument(
        &self,
        id: i64,
        update: InstrumentUpdate,
    ) -> Result<Instrument, LedgerError> {
        let mut instrument = self.store.fetch(id).await?;

        if let Some(quantity) = update.quantity {
            if quantity < 0 {
                return Err(LedgerError::InvalidInput(
                    "Quantity must not be negative.".to_string(),
                ));
            }
            instrument.quantity = quantity;
        }
        if let Some(buy_price) = update.buy_price {
            if buy_price <= 0.0 {
                return Err(LedgerError::InvalidInput(
                    "Buy price must be a positive number.".to_string(),
                ));
            }
            instrument.buy_price = buy_price;
        }
        if let Some(current_price) = update.current_price {
            if current_price <= 0.0 {
                return Err(LedgerError::InvalidInput(
                    "Current price must be a positive number.".to_string(),
                ));
            }
            instrument.current_price = Some(current_price);
        }
        if let Some(name) = update.name {
            instrument.name = name;
        }

        self.store.update(&instrument).await?;
        tracing::info!(id, symbol = %instrument.symbol, "instrument updated");
        self.sync_cache(&instrument);
        Ok(instrument)
    }

    /// Deletes an instrument and removes its cache entry.
    pub async fn delete_instrument(&self, id: i64) -> Result<(), LedgerError> {
        self.store.delete(id).await?;
        tracing::info!(id, "instrument deleted from the ledger");
        self.evict_cache(id);
        Ok(())
    }

    pub async fn get_by_symbol(&self, symbol: &str) -> Result<Instrument, LedgerError> {
        self.store.fetch_by_symbol(symbol).await
    }

    pub async fn list_all(&self) -> Result<Vec<Instrument>, LedgerError> {
        self.store.fetch_all().await
    }

    /// Total value of all tracked instruments, each falling back to its cost
    /// basis when no live price has been observed.
    pub async fn portfolio_value(&self) -> Result<f64, LedgerError> {
        let instruments = self.store.fetch_all().await?;
        let value = instruments.iter().map(Instrument::market_value).sum();
        tracing::info!(value, "total ledger value calculated");
        Ok(value)
    }

    /// Instruments ordered descending by the chosen metric.
    pub async fn leaderboard(&self, sort_by: &str) -> Result<Vec<LeaderboardEntry>, LedgerError> {
        let key = SortKey::parse(sort_by)
            .ok_or_else(|| LedgerError::InvalidSortKey(sort_by.to_string()))?;

        let mut instruments = self.store.fetch_all().await?;
        match key {
            SortKey::Value => {
                instruments.sort_by(|a, b| b.market_value().total_cmp(&a.market_value()));
            }
            SortKey::Quantity => instruments.sort_by(|a, b| b.quantity.cmp(&a.quantity)),
        }

        Ok(instruments
            .into_iter()
            .map(|i| LeaderboardEntry {
                id: i.id,
                symbol: i.symbol.clone(),
                name: i.name.clone(),
                quantity: i.quantity,
                current_price: i.current_price,
                total_value: round_cents(i.market_value()),
            })
            .collect())
    }

    /// Explicit post-commit cache refresh. Quantity zero means the entry is
    /// removed; cache failures are logged and swallowed, never retried.
    fn sync_cache(&self, instrument: &Instrument) {
        let outcome = if instrument.quantity == 0 {
            self.cache.remove(instrument.id)
        } else {
            self.cache.put(instrument)
        };
        if let Err(e) = outcome {
            tracing::warn!(id = instrument.id, error = %e, "cache refresh failed");
        }
    }

    fn evict_cache(&self, id: i64) {
        if let Err(e) = self.cache.remove(id) {
            tracing::warn!(id, error = %e, "cache eviction failed");
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use price_cache::MemoryCache;

    fn ledger() -> (InstrumentLedger, Arc<MemoryStore>, Arc<MemoryCache>) {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let ledger = InstrumentLedger::new(store.clone(), cache.clone());
        (ledger, store, cache)
    }

    fn new_instrument(symbol: &str, quantity: i64, buy_price: f64) -> NewInstrument {
        NewInstrument {
            symbol: symbol.to_string(),
            name: format!("{symbol} Inc."),
            quantity,
            buy_price,
        }
    }

    #[tokio::test]
    async fn add_instrument_round_trips_through_get_by_symbol() {
        let (ledger, _, _) = ledger();
        let added = ledger
            .add_instrument(NewInstrument {
                symbol: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
                quantity: 50,
                buy_price: 150.0,
            })
            .await
            .unwrap();

        let fetched = ledger.get_by_symbol("AAPL").await.unwrap();
        assert_eq!(fetched, added);
        assert_eq!(fetched.name, "Apple Inc.");
        assert_eq!(fetched.quantity, 50);
        assert_eq!(fetched.buy_price, 150.0);
        assert_eq!(fetched.current_price, None);
    }

    #[tokio::test]
    async fn add_instrument_rejects_non_positive_inputs() {
        let (ledger, store, _) = ledger();
        for (quantity, buy_price) in [(0, 100.0), (-10, 100.0), (30, 0.0), (30, -250.0)] {
            let err = ledger
                .add_instrument(new_instrument("GOOGL", quantity, buy_price))
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidInput(_)));
        }
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn duplicate_symbol_is_rejected_and_store_keeps_one_row() {
        let (ledger, store, _) = ledger();
        ledger
            .add_instrument(new_instrument("TSLA", 20, 700.0))
            .await
            .unwrap();

        let err = ledger
            .add_instrument(new_instrument("TSLA", 15, 720.0))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateSymbol(s) if s == "TSLA"));
        assert_eq!(
            store.rows().iter().filter(|i| i.symbol == "TSLA").count(),
            1
        );
    }

    #[tokio::test]
    async fn add_populates_cache_entry() {
        let (ledger, _, cache) = ledger();
        let added = ledger
            .add_instrument(new_instrument("AAPL", 50, 150.0))
            .await
            .unwrap();

        let snapshot = cache.get(added.id).unwrap();
        assert_eq!(snapshot["symbol"], "AAPL");
        assert_eq!(snapshot["quantity"], "50");
    }

    #[tokio::test]
    async fn updating_quantity_to_zero_removes_cache_entry() {
        let (ledger, _, cache) = ledger();
        let added = ledger
            .add_instrument(new_instrument("AAPL", 50, 150.0))
            .await
            .unwrap();
        assert!(cache.get(added.id).is_some());

        let update = InstrumentUpdate {
            quantity: Some(0),
            ..Default::default()
        };
        ledger.update_instrument(added.id, update).await.unwrap();
        assert!(cache.get(added.id).is_none());
    }

    #[tokio::test]
    async fn non_quantity_update_with_zero_quantity_still_evicts() {
        let (ledger, _, cache) = ledger();
        let added = ledger
            .add_instrument(new_instrument("AAPL", 50, 150.0))
            .await
            .unwrap();
        ledger
            .update_instrument(
                added.id,
                InstrumentUpdate {
                    quantity: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // A later price-only update must not resurrect the cache entry while
        // the quantity is still zero.
        ledger
            .update_instrument(
                added.id,
                InstrumentUpdate {
                    current_price: Some(155.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cache.get(added.id).is_none());
    }

    #[tokio::test]
    async fn nonzero_update_upserts_full_snapshot() {
        let (ledger, _, cache) = ledger();
        let added = ledger
            .add_instrument(new_instrument("AAPL", 50, 150.0))
            .await
            .unwrap();

        let updated = ledger
            .update_instrument(
                added.id,
                InstrumentUpdate {
                    quantity: Some(25),
                    current_price: Some(160.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let snapshot = cache.get(added.id).unwrap();
        assert_eq!(snapshot, price_cache::snapshot_of(&updated));
        assert_eq!(snapshot["quantity"], "25");
        assert_eq!(snapshot["current_price"], "160.5");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (ledger, _, _) = ledger();
        let err = ledger
            .update_instrument(
                99,
                InstrumentUpdate {
                    quantity: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_row_and_cache_entry() {
        let (ledger, store, cache) = ledger();
        let added = ledger
            .add_instrument(new_instrument("AAPL", 50, 150.0))
            .await
            .unwrap();

        ledger.delete_instrument(added.id).await.unwrap();
        assert!(store.rows().is_empty());
        assert!(cache.get(added.id).is_none());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found_and_store_unchanged() {
        let (ledger, store, _) = ledger();
        ledger
            .add_instrument(new_instrument("AAPL", 50, 150.0))
            .await
            .unwrap();

        let err = ledger.delete_instrument(1234).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn portfolio_value_falls_back_to_buy_price() {
        let (ledger, _, _) = ledger();
        ledger
            .add_instrument(new_instrument("AAPL", 50, 150.0))
            .await
            .unwrap();
        ledger
            .add_instrument(new_instrument("GOOGL", 10, 2800.0))
            .await
            .unwrap();
        let tsla = ledger
            .add_instrument(new_instrument("TSLA", 5, 700.0))
            .await
            .unwrap();
        ledger
            .update_instrument(
                tsla.id,
                InstrumentUpdate {
                    current_price: Some(750.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let value = ledger.portfolio_value().await.unwrap();
        assert_eq!(value, 50.0 * 150.0 + 10.0 * 2800.0 + 5.0 * 750.0);
        assert_eq!(value, 39250.0);
    }

    #[tokio::test]
    async fn leaderboard_sorts_descending_by_value_and_quantity() {
        let (ledger, _, _) = ledger();
        ledger
            .add_instrument(new_instrument("AAPL", 50, 150.0)) // value 7500
            .await
            .unwrap();
        ledger
            .add_instrument(new_instrument("GOOGL", 10, 2800.0)) // value 28000
            .await
            .unwrap();
        ledger
            .add_instrument(new_instrument("TSLA", 5, 700.0)) // value 3500
            .await
            .unwrap();

        let by_value = ledger.leaderboard("value").await.unwrap();
        let symbols: Vec<_> = by_value.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, ["GOOGL", "AAPL", "TSLA"]);
        assert_eq!(by_value[0].total_value, 28000.0);

        let by_quantity = ledger.leaderboard("quantity").await.unwrap();
        let symbols: Vec<_> = by_quantity.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, ["AAPL", "GOOGL", "TSLA"]);
    }

    #[tokio::test]
    async fn leaderboard_rejects_unknown_sort_key() {
        let (ledger, _, _) = ledger();
        let err = ledger.leaderboard("alphabetical").await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSortKey(k) if k == "alphabetical"));
    }
}
