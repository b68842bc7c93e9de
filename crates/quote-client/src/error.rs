use thiserror::Error;

/// Classified failures of the external quote provider.
///
/// The HTTP boundary normalizes all of these to a single "price unavailable"
/// condition; the distinction exists for logging and for the bulk-refresh
/// failure report.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Network error talking to the quote provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("The quote provider returned HTTP status {0}")]
    Status(u16),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("The quote provider rate limit was hit")]
    RateLimited,

    #[error("Malformed response from the quote provider: {0}")]
    Malformed(String),

    #[error("Provider response is missing field `{0}`")]
    MissingField(String),
}
