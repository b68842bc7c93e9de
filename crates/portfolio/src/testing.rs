//! In-memory `PortfolioStore` with the same compare-and-swap behavior as the
//! real document store.

use crate::error::PortfolioError;
use crate::model::Portfolio;
use crate::store::PortfolioStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryPortfolioStore {
    docs: Mutex<HashMap<i64, Portfolio>>,
}

impl MemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read of the stored document, bypassing the engine.
    pub fn stored(&self, user_id: i64) -> Option<Portfolio> {
        self.docs
            .lock()
            .expect("store lock poisoned")
            .get(&user_id)
            .cloned()
    }
}

#[async_trait]
impl PortfolioStore for MemoryPortfolioStore {
    async fn find(&self, user_id: i64) -> Result<Option<Portfolio>, PortfolioError> {
        Ok(self.stored(user_id))
    }

    async fn insert(&self, portfolio: &Portfolio) -> Result<(), PortfolioError> {
        let mut docs = self.docs.lock().expect("store lock poisoned");
        if docs.contains_key(&portfolio.user_id) {
            return Err(PortfolioError::AlreadyExists(portfolio.user_id));
        }
        docs.insert(portfolio.user_id, portfolio.clone());
        Ok(())
    }

    async fn replace(&self, portfolio: &Portfolio) -> Result<(), PortfolioError> {
        let mut docs = self.docs.lock().expect("store lock poisoned");
        match docs.get_mut(&portfolio.user_id) {
            Some(stored) if stored.version == portfolio.version => {
                *stored = portfolio.clone();
                stored.version += 1;
                Ok(())
            }
            Some(_) => Err(PortfolioError::Conflict),
            None => Err(PortfolioError::NotFound),
        }
    }
}
