//! A canned-price `QuoteClient` for tests in crates that depend on quotes.

use crate::error::QuoteError;
use crate::responses::{HistoricalBar, SymbolInfo};
use crate::QuoteClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves fixed prices from a map; any symbol not in the map fails with
/// `UnknownSymbol`, which doubles as the induced-failure mechanism.
#[derive(Debug, Default)]
pub struct FixedQuotes {
    prices: HashMap<String, f64>,
    calls: AtomicUsize,
}

impl FixedQuotes {
    pub fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(s, p)| (s.to_string(), *p))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of price lookups made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteClient for FixedQuotes {
    async fn get_price(&self, symbol: &str) -> Result<f64, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| QuoteError::UnknownSymbol(symbol.to_string()))
    }

    async fn get_history(
        &self,
        symbol: &str,
        _interval: &str,
        _output_size: &str,
    ) -> Result<Vec<HistoricalBar>, QuoteError> {
        Err(QuoteError::UnknownSymbol(symbol.to_string()))
    }

    async fn get_info(&self, symbol: &str) -> SymbolInfo {
        SymbolInfo::placeholder(symbol)
    }
}
