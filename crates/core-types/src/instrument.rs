use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked tradable symbol in the shared ledger.
///
/// This is the authoritative record the price cache mirrors. It is distinct
/// from a user's personal holding: the ledger tracks aggregate quantities
/// across all users to back the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: i64,
    /// Ticker symbol, globally unique within the ledger.
    pub symbol: String,
    pub name: String,
    /// Number of shares tracked. Zero is a soft-delete signal for the cache.
    pub quantity: i64,
    /// Cost basis per share at acquisition. Strictly positive.
    pub buy_price: f64,
    /// Last observed market price, if one has ever been fetched.
    pub current_price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Instrument {
    /// Market value of the tracked position, falling back to the cost basis
    /// when no live price has been observed yet.
    pub fn market_value(&self) -> f64 {
        self.quantity as f64 * self.current_price.unwrap_or(self.buy_price)
    }
}

/// The fields required to create a new ledger instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInstrument {
    pub symbol: String,
    pub name: String,
    pub quantity: i64,
    pub buy_price: f64,
}

/// A closed, enumerated set of updatable instrument attributes.
///
/// Replaces a dynamic field map: an unknown field is unrepresentable here,
/// and the HTTP layer rejects unknown JSON keys during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentUpdate {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub buy_price: Option<f64>,
    pub current_price: Option<f64>,
}

impl InstrumentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.buy_price.is_none()
            && self.current_price.is_none()
    }
}

/// Sorting criteria accepted by the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Value,
    Quantity,
}

impl SortKey {
    /// Parses the wire-level sort parameter. Anything other than `value`
    /// or `quantity` is invalid.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "value" => Some(SortKey::Value),
            "quantity" => Some(SortKey::Quantity),
            _ => None,
        }
    }
}

/// One row of the cross-user leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub quantity: i64,
    pub current_price: Option<f64>,
    /// `quantity * (current_price or buy_price)`, rounded to cents for display.
    pub total_value: f64,
}
