//! # Valuation Reporter
//!
//! Bulk-refreshes the ledger's cached prices from the quote provider. Each
//! symbol is fetched and committed independently: one bad symbol never
//! aborts or rolls back the rest of the batch.

use core_types::InstrumentUpdate;
use ledger::InstrumentLedger;
use quote_client::QuoteClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One successfully refreshed symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub symbol: String,
    pub current_price: f64,
}

/// One symbol that could not be refreshed, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshFailure {
    pub symbol: String,
    pub error: String,
}

/// Outcome of a bulk refresh: partial failure is reported, never raised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    pub updated: Vec<PriceUpdate>,
    pub failed: Vec<RefreshFailure>,
}

pub struct PriceRefresher {
    ledger: Arc<InstrumentLedger>,
    quotes: Arc<dyn QuoteClient>,
}

impl PriceRefresher {
    pub fn new(ledger: Arc<InstrumentLedger>, quotes: Arc<dyn QuoteClient>) -> Self {
        Self { ledger, quotes }
    }

    /// Fetches a live price for every ledger instrument and writes it back
    /// through the ledger's update path, refreshing the cache as a side
    /// effect. N sequential provider calls, N independent commits.
    pub async fn refresh_all_prices(&self) -> Result<RefreshReport, ledger::LedgerError> {
        let instruments = self.ledger.list_all().await?;
        let mut report = RefreshReport::default();

        for instrument in instruments {
            let price = match self.quotes.get_price(&instrument.symbol).await {
                Ok(price) => price,
                Err(e) => {
                    tracing::warn!(symbol = %instrument.symbol, error = %e, "price refresh failed");
                    report.failed.push(RefreshFailure {
                        symbol: instrument.symbol,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let update = InstrumentUpdate {
                current_price: Some(price),
                ..Default::default()
            };
            match self.ledger.update_instrument(instrument.id, update).await {
                Ok(_) => report.updated.push(PriceUpdate {
                    symbol: instrument.symbol,
                    current_price: price,
                }),
                Err(e) => {
                    tracing::warn!(symbol = %instrument.symbol, error = %e, "price commit failed");
                    report.failed.push(RefreshFailure {
                        symbol: instrument.symbol,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "bulk price refresh finished"
        );
        Ok(report)
    }
}
