//! In-memory `AccountStore` for tests.

use crate::error::AccountError;
use crate::store::AccountStore;
use async_trait::async_trait;
use chrono::Utc;
use core_types::User;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    rows: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, AccountError> {
        let mut rows = self.rows.lock().expect("store lock poisoned");
        if rows.iter().any(|u| u.username == username) {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AccountError> {
        let rows = self.rows.lock().expect("store lock poisoned");
        Ok(rows.iter().find(|u| u.username == username).cloned())
    }

    async fn delete_by_username(&self, username: &str) -> Result<(), AccountError> {
        let mut rows = self.rows.lock().expect("store lock poisoned");
        let before = rows.len();
        rows.retain(|u| u.username != username);
        if rows.len() == before {
            return Err(AccountError::NotFound(username.to_string()));
        }
        Ok(())
    }
}
