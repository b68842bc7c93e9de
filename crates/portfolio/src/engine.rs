use crate::error::PortfolioError;
use crate::model::Portfolio;
use crate::store::PortfolioStore;
use quote_client::QuoteClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-holding line of a portfolio report, valued at the live price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingReport {
    pub symbol: String,
    pub shares: i64,
    pub current_price: f64,
    pub total_value: f64,
    pub avg_purchase_price: f64,
    pub gain_loss: f64,
}

/// Full valuation of one user's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub holdings: Vec<HoldingReport>,
    pub cash_balance: f64,
    pub total_stock_value: f64,
    pub total_portfolio_value: f64,
}

/// Executes simulated trades against per-user cash balances and holdings.
///
/// Collaborators are injected: the document store behind `PortfolioStore`
/// and the market-data provider behind `QuoteClient`.
pub struct PortfolioEngine {
    store: Arc<dyn PortfolioStore>,
    quotes: Arc<dyn QuoteClient>,
    starting_cash: f64,
}

impl PortfolioEngine {
    pub fn new(
        store: Arc<dyn PortfolioStore>,
        quotes: Arc<dyn QuoteClient>,
        starting_cash: f64,
    ) -> Self {
        Self {
            store,
            quotes,
            starting_cash,
        }
    }

    /// Creates an empty portfolio with the fixed starting cash balance.
    pub async fn initialize(&self, user_id: i64) -> Result<Portfolio, PortfolioError> {
        let portfolio = Portfolio::new(user_id, self.starting_cash);
        self.store.insert(&portfolio).await?;
        tracing::info!(user_id, cash = self.starting_cash, "portfolio initialized");
        Ok(portfolio)
    }

    /// Fetches the user's portfolio, lazily initializing one on first access.
    pub async fn get_or_init(&self, user_id: i64) -> Result<Portfolio, PortfolioError> {
        if let Some(portfolio) = self.store.find(user_id).await? {
            return Ok(portfolio);
        }
        match self.initialize(user_id).await {
            Ok(portfolio) => Ok(portfolio),
            // Lost the init race; the other writer's document is the one.
            Err(PortfolioError::AlreadyExists(_)) => self
                .store
                .find(user_id)
                .await?
                .ok_or(PortfolioError::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Values every holding at its live price and reports per-holding and
    /// total figures. Costs one provider call per distinct held symbol; no
    /// request coalescing.
    pub async fn get_portfolio(&self, user_id: i64) -> Result<PortfolioReport, PortfolioError> {
        let portfolio = self.get_or_init(user_id).await?;

        let mut holdings = Vec::with_capacity(portfolio.holdings.len());
        let mut total_stock_value = 0.0;
        for holding in &portfolio.holdings {
            let current_price = self.quotes.get_price(&holding.symbol).await?;
            let total_value = current_price * holding.shares as f64;
            total_stock_value += total_value;
            holdings.push(HoldingReport {
                symbol: holding.symbol.clone(),
                shares: holding.shares,
                current_price,
                total_value,
                avg_purchase_price: holding.avg_purchase_price,
                gain_loss: total_value - holding.shares as f64 * holding.avg_purchase_price,
            });
        }

        Ok(PortfolioReport {
            holdings,
            cash_balance: portfolio.cash_balance,
            total_stock_value,
            total_portfolio_value: total_stock_value + portfolio.cash_balance,
        })
    }

    /// Buys `shares` of `symbol` at `price`, debiting cash.
    pub async fn buy(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: f64,
    ) -> Result<Portfolio, PortfolioError> {
        validate_trade(shares, price)?;
        let mut portfolio = self
            .store
            .find(user_id)
            .await?
            .ok_or(PortfolioError::NotFound)?;

        portfolio.apply_buy(symbol, shares, price)?;
        self.store.replace(&portfolio).await?;
        portfolio.version += 1;

        tracing::info!(
            user_id,
            symbol,
            shares,
            price,
            cash = portfolio.cash_balance,
            "buy executed"
        );
        Ok(portfolio)
    }

    /// Sells `shares` of `symbol` at `price`, crediting the proceeds to cash.
    pub async fn sell(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: f64,
    ) -> Result<Portfolio, PortfolioError> {
        validate_trade(shares, price)?;
        let mut portfolio = self
            .store
            .find(user_id)
            .await?
            .ok_or(PortfolioError::NotFound)?;

        portfolio.apply_sell(symbol, shares, price)?;
        self.store.replace(&portfolio).await?;
        portfolio.version += 1;

        tracing::info!(
            user_id,
            symbol,
            shares,
            price,
            cash = portfolio.cash_balance,
            "sell executed"
        );
        Ok(portfolio)
    }
}

fn validate_trade(shares: i64, price: f64) -> Result<(), PortfolioError> {
    if shares <= 0 {
        return Err(PortfolioError::InvalidInput(
            "Number of shares must be positive.".to_string(),
        ));
    }
    if price <= 0.0 {
        return Err(PortfolioError::InvalidInput(
            "Price must be a positive number.".to_string(),
        ));
    }
    Ok(())
}
