use crate::error::AccountError;
use async_trait::async_trait;
use core_types::User;

/// The user table behind the account service. Username uniqueness is the
/// store's constraint; implementations map violations to `UsernameTaken`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, AccountError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AccountError>;

    /// Deletes the user row. Portfolio data is intentionally not cascaded;
    /// it lives in a separate store keyed by user id.
    async fn delete_by_username(&self, username: &str) -> Result<(), AccountError>;
}
