use crate::error::QuoteError;
use async_trait::async_trait;
use configuration::settings::ProviderConfig;
use serde_json::Value;
use std::time::Duration;

pub mod error;
pub mod responses;
pub mod testing;

// --- Public API ---
pub use responses::{HistoricalBar, SymbolInfo};

/// The generic, abstract interface to an external market-data provider.
/// This trait is the contract the ledger and portfolio engine depend on,
/// allowing the underlying implementation (live or fake) to be swapped out.
#[async_trait]
pub trait QuoteClient: Send + Sync {
    /// Fetches the latest traded price for a symbol.
    async fn get_price(&self, symbol: &str) -> Result<f64, QuoteError>;

    /// Fetches a historical daily series for a symbol. `output_size` is
    /// `"compact"` or `"full"`; the provider only serves daily bars, so the
    /// requested interval does not change the endpoint.
    async fn get_history(
        &self,
        symbol: &str,
        interval: &str,
        output_size: &str,
    ) -> Result<Vec<HistoricalBar>, QuoteError>;

    /// Fetches descriptive company data. Never fails: any provider problem
    /// degrades to a placeholder record so lookup pages keep rendering.
    async fn get_info(&self, symbol: &str) -> SymbolInfo;
}

/// A concrete implementation of `QuoteClient` for the Alpha Vantage API.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, QuoteError> {
        // Every provider call is bounded; a hung upstream must not hang the
        // request that triggered it.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value, QuoteError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| QuoteError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl QuoteClient for AlphaVantageClient {
    async fn get_price(&self, symbol: &str) -> Result<f64, QuoteError> {
        let body = self
            .get_json(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;
        responses::parse_global_quote(&body, symbol)
    }

    async fn get_history(
        &self,
        symbol: &str,
        interval: &str,
        output_size: &str,
    ) -> Result<Vec<HistoricalBar>, QuoteError> {
        tracing::debug!(symbol, interval, output_size, "fetching historical series");
        let body = self
            .get_json(&[
                ("function", "TIME_SERIES_DAILY_ADJUSTED"),
                ("symbol", symbol),
                ("outputsize", output_size),
            ])
            .await?;
        responses::parse_daily_series(&body, symbol)
    }

    async fn get_info(&self, symbol: &str) -> SymbolInfo {
        let body = match self
            .get_json(&[("function", "OVERVIEW"), ("symbol", symbol)])
            .await
        {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "symbol info unavailable, using placeholder");
                return SymbolInfo::placeholder(symbol);
            }
        };

        responses::parse_overview(&body, symbol).unwrap_or_else(|| {
            tracing::warn!(symbol, "provider had no overview data, using placeholder");
            SymbolInfo::placeholder(symbol)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::error::QuoteError;
    use super::responses::{
        parse_daily_series, parse_global_quote, parse_overview, SymbolInfo,
    };
    use serde_json::json;

    #[test]
    fn global_quote_extracts_price() {
        let body = json!({
            "Global Quote": {
                "01. symbol": "AAPL",
                "05. price": "150.2500",
                "07. latest trading day": "2024-06-03"
            }
        });
        let price = parse_global_quote(&body, "AAPL").unwrap();
        assert_eq!(price, 150.25);
    }

    #[test]
    fn empty_global_quote_means_unknown_symbol() {
        let body = json!({ "Global Quote": {} });
        assert!(matches!(
            parse_global_quote(&body, "NOPE"),
            Err(QuoteError::UnknownSymbol(s)) if s == "NOPE"
        ));
    }

    #[test]
    fn missing_price_field_is_classified() {
        let body = json!({ "Global Quote": { "01. symbol": "AAPL" } });
        assert!(matches!(
            parse_global_quote(&body, "AAPL"),
            Err(QuoteError::MissingField(f)) if f == "05. price"
        ));
    }

    #[test]
    fn non_numeric_price_is_malformed() {
        let body = json!({ "Global Quote": { "05. price": "not-a-number" } });
        assert!(matches!(
            parse_global_quote(&body, "AAPL"),
            Err(QuoteError::Malformed(_))
        ));
    }

    #[test]
    fn rate_limit_note_is_classified() {
        let body = json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."
        });
        assert!(matches!(
            parse_global_quote(&body, "AAPL"),
            Err(QuoteError::RateLimited)
        ));
    }

    #[test]
    fn error_message_body_means_unknown_symbol() {
        let body = json!({ "Error Message": "Invalid API call." });
        assert!(matches!(
            parse_daily_series(&body, "BOGUS"),
            Err(QuoteError::UnknownSymbol(s)) if s == "BOGUS"
        ));
    }

    #[test]
    fn daily_series_is_sorted_newest_first() {
        let body = json!({
            "Time Series (Daily)": {
                "2024-06-03": {
                    "1. open": "100.0", "2. high": "102.0", "3. low": "99.0",
                    "4. close": "101.0", "6. volume": "12000"
                },
                "2024-06-04": {
                    "1. open": "101.0", "2. high": "105.0", "3. low": "100.5",
                    "4. close": "104.0", "6. volume": "15000"
                }
            }
        });
        let bars = parse_daily_series(&body, "AAPL").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date.to_string(), "2024-06-04");
        assert_eq!(bars[0].close, 104.0);
        assert_eq!(bars[1].date.to_string(), "2024-06-03");
    }

    #[test]
    fn overview_parses_and_falls_back_per_field() {
        let body = json!({
            "Name": "Apple Inc",
            "Description": "Designs consumer electronics.",
            "Exchange": "NASDAQ"
        });
        let info = parse_overview(&body, "AAPL").unwrap();
        assert_eq!(info.name, "Apple Inc");
        assert_eq!(info.exchange, "NASDAQ");
        assert_eq!(info.sector, "N/A");
    }

    #[test]
    fn empty_overview_yields_no_info() {
        let body = json!({});
        assert!(parse_overview(&body, "AAPL").is_none());
        let placeholder = SymbolInfo::placeholder("AAPL");
        assert_eq!(placeholder.name, "AAPL");
        assert_eq!(placeholder.exchange, "N/A");
    }
}
