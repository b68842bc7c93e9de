use crate::error::AccountError;
use crate::store::AccountStore;
use bcrypt::{hash, verify, DEFAULT_COST};
use core_types::User;
use std::sync::Arc;

/// Registration, deletion and credential checking over the user store.
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Creates a new account, storing only a salted hash of the password.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AccountError> {
        if username.is_empty() || password.is_empty() {
            return Err(AccountError::InvalidInput(
                "Both username and password are required.".to_string(),
            ));
        }
        let password_hash = hash(password, DEFAULT_COST)?;
        let user = self.store.insert(username, &password_hash).await?;
        tracing::info!(username, "user registered");
        Ok(user)
    }

    pub async fn delete(&self, username: &str) -> Result<(), AccountError> {
        self.store.delete_by_username(username).await?;
        tracing::info!(username, "user deleted");
        Ok(())
    }

    /// Validates a login attempt and returns the user id on success.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller; both fail with `InvalidCredentials`.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<i64, AccountError> {
        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if verify(password, &user.password_hash).unwrap_or(false) {
            Ok(user.id)
        } else {
            tracing::warn!(username, "login failed");
            Err(AccountError::InvalidCredentials)
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AccountError> {
        self.store.find_by_username(username).await
    }
}
