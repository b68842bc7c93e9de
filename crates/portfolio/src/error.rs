use quote_client::error::QuoteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Portfolio for user {0} already exists.")]
    AlreadyExists(i64),

    #[error("User portfolio not found")]
    NotFound,

    #[error("Insufficient funds. Cost: ${cost:.2}, Available: ${available:.2}")]
    InsufficientFunds { cost: f64, available: f64 },

    #[error("Insufficient shares of {symbol}: requested {requested}, held {held}")]
    InsufficientShares {
        symbol: String,
        requested: i64,
        held: i64,
    },

    #[error("Portfolio was modified concurrently; the operation was not applied")]
    Conflict,

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Storage backend error: {0}")]
    Backend(String),
}
