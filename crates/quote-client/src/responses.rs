use crate::error::QuoteError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One day of historical prices for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Descriptive company data for the lookup page.
///
/// Always best-effort: the client substitutes placeholders rather than
/// failing, so a lookup page can render even when the provider is down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub exchange: String,
    pub sector: String,
    pub industry: String,
}

impl SymbolInfo {
    /// The fallback record used when the provider cannot describe a symbol.
    pub fn placeholder(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            description: "No description available.".to_string(),
            exchange: "N/A".to_string(),
            sector: "N/A".to_string(),
            industry: "N/A".to_string(),
        }
    }
}

/// Checks the provider-level error conventions that apply to every endpoint.
///
/// Alpha Vantage reports problems inside a 200 body: an `Error Message` key
/// for unrecognized symbols and a `Note`/`Information` key when the request
/// rate limit is exceeded.
pub fn classify_provider_body(body: &Value, symbol: &str) -> Result<(), QuoteError> {
    if body.get("Error Message").is_some() {
        return Err(QuoteError::UnknownSymbol(symbol.to_string()));
    }
    if body.get("Note").is_some() || body.get("Information").is_some() {
        return Err(QuoteError::RateLimited);
    }
    Ok(())
}

/// Extracts the latest price from a `GLOBAL_QUOTE` response body.
pub fn parse_global_quote(body: &Value, symbol: &str) -> Result<f64, QuoteError> {
    classify_provider_body(body, symbol)?;

    let quote = body
        .get("Global Quote")
        .ok_or_else(|| QuoteError::MissingField("Global Quote".to_string()))?;

    // An empty quote object is how the provider signals an unknown symbol
    // on this endpoint.
    if quote.as_object().is_some_and(|o| o.is_empty()) {
        return Err(QuoteError::UnknownSymbol(symbol.to_string()));
    }

    let raw = quote
        .get("05. price")
        .and_then(Value::as_str)
        .ok_or_else(|| QuoteError::MissingField("05. price".to_string()))?;

    raw.parse::<f64>()
        .map_err(|_| QuoteError::Malformed(format!("non-numeric price: {raw:?}")))
}

/// Extracts the daily series from a `TIME_SERIES_DAILY_ADJUSTED` response
/// body, newest day first.
pub fn parse_daily_series(body: &Value, symbol: &str) -> Result<Vec<HistoricalBar>, QuoteError> {
    classify_provider_body(body, symbol)?;

    let series = body
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .ok_or_else(|| QuoteError::MissingField("Time Series (Daily)".to_string()))?;

    let mut bars = Vec::with_capacity(series.len());
    for (day, fields) in series {
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|_| QuoteError::Malformed(format!("bad series date: {day:?}")))?;
        bars.push(HistoricalBar {
            date,
            open: numeric_field(fields, "1. open")?,
            high: numeric_field(fields, "2. high")?,
            low: numeric_field(fields, "3. low")?,
            close: numeric_field(fields, "4. close")?,
            volume: numeric_field(fields, "6. volume")?,
        });
    }
    bars.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(bars)
}

/// Builds a `SymbolInfo` from an `OVERVIEW` response body, if it has one.
pub fn parse_overview(body: &Value, symbol: &str) -> Option<SymbolInfo> {
    classify_provider_body(body, symbol).ok()?;
    // The overview endpoint answers unknown symbols with an empty object.
    let name = body.get("Name").and_then(Value::as_str)?;

    let field = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string()
    };

    Some(SymbolInfo {
        symbol: symbol.to_string(),
        name: name.to_string(),
        description: field("Description"),
        exchange: field("Exchange"),
        sector: field("Sector"),
        industry: field("Industry"),
    })
}

fn numeric_field(fields: &Value, key: &str) -> Result<f64, QuoteError> {
    let raw = fields
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| QuoteError::MissingField(key.to_string()))?;
    raw.parse::<f64>()
        .map_err(|_| QuoteError::Malformed(format!("non-numeric value for `{key}`: {raw:?}")))
}
