use accounts::AccountError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger::LedgerError;
use portfolio::PortfolioError;
use quote_client::error::QuoteError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps the domain error taxonomy onto HTTP status codes. Validation and
    /// not-found conditions surface their own messages; anything internal is
    /// reported generically so no details leak.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Ledger(e) => match e {
                LedgerError::InvalidInput(_) | LedgerError::InvalidSortKey(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                LedgerError::DuplicateSymbol(_) => (StatusCode::CONFLICT, e.to_string()),
                LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                LedgerError::Backend(_) => internal(e),
            },
            AppError::Portfolio(e) => match e {
                PortfolioError::InvalidInput(_)
                | PortfolioError::InsufficientFunds { .. }
                | PortfolioError::InsufficientShares { .. } => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                PortfolioError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
                PortfolioError::AlreadyExists(_) | PortfolioError::Conflict => {
                    (StatusCode::CONFLICT, e.to_string())
                }
                PortfolioError::Quote(q) => price_unavailable(q),
                PortfolioError::Backend(_) => internal(e),
            },
            AppError::Account(e) => match e {
                AccountError::InvalidInput(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                AccountError::UsernameTaken(_) => (StatusCode::CONFLICT, e.to_string()),
                AccountError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                AccountError::InvalidCredentials | AccountError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                AccountError::Hash(_) | AccountError::Backend(_) => internal(e),
            },
            AppError::Quote(q) => price_unavailable(q),
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Internal(e) => internal(e),
        }
    }
}

/// Provider failures of any kind are normalized to one condition at the
/// boundary.
fn price_unavailable(e: &QuoteError) -> (StatusCode, String) {
    tracing::warn!(error = %e, "quote provider failure");
    (
        StatusCode::BAD_GATEWAY,
        format!("Price unavailable: {e}"),
    )
}

fn internal(e: &dyn std::fmt::Display) -> (StatusCode, String) {
    tracing::error!(error = %e, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred".to_string(),
    )
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
