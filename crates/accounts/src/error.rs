use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("User with username '{0}' already exists.")]
    UsernameTaken(String),

    #[error("User '{0}' not found.")]
    NotFound(String),

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Invalid or expired session token.")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Storage backend error: {0}")]
    Backend(String),
}
