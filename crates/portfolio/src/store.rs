use crate::error::PortfolioError;
use crate::model::Portfolio;
use async_trait::async_trait;

/// The per-user document store behind the portfolio engine.
///
/// One portfolio per user, enforced by the store's uniqueness constraint.
/// `replace` is a compare-and-swap on the portfolio's version: a stale
/// version means another writer won the race and the call fails with
/// `Conflict`, leaving the stored document untouched.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn find(&self, user_id: i64) -> Result<Option<Portfolio>, PortfolioError>;

    /// Inserts a fresh portfolio; fails with `AlreadyExists` if the user
    /// already has one.
    async fn insert(&self, portfolio: &Portfolio) -> Result<(), PortfolioError>;

    /// Atomically replaces the portfolio whose stored version matches
    /// `portfolio.version`, bumping the stored version by one.
    async fn replace(&self, portfolio: &Portfolio) -> Result<(), PortfolioError>;
}
