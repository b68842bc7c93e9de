use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Instrument with symbol '{0}' already exists.")]
    DuplicateSymbol(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid sort_by parameter: {0}")]
    InvalidSortKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl LedgerError {
    pub fn id_not_found(id: i64) -> Self {
        LedgerError::NotFound(format!("Instrument with ID {id} not found."))
    }

    pub fn symbol_not_found(symbol: &str) -> Self {
        LedgerError::NotFound(format!("Instrument with symbol '{symbol}' not found."))
    }
}
