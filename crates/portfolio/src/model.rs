use crate::error::PortfolioError;
use serde::{Deserialize, Serialize};

/// A user's position in one symbol: share count plus the volume-weighted
/// average acquisition cost per share.
///
/// Shares are strictly positive while a holding exists; a holding whose
/// shares would drop to zero is removed from the portfolio, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: i64,
    pub avg_purchase_price: f64,
}

/// One user's simulated-trading state: cash plus holdings, unique by symbol.
///
/// `version` backs optimistic concurrency control: the store only replaces a
/// portfolio whose stored version matches, so two concurrent read-modify-write
/// cycles cannot silently overwrite each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub user_id: i64,
    pub cash_balance: f64,
    pub holdings: Vec<Holding>,
    pub version: i64,
}

impl Portfolio {
    pub fn new(user_id: i64, starting_cash: f64) -> Self {
        Self {
            user_id,
            cash_balance: starting_cash,
            holdings: Vec::new(),
            version: 0,
        }
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    /// The single holding-merge rule both trade directions flow through.
    ///
    /// A positive delta merges into the existing holding, recomputing the
    /// volume-weighted average cost, or appends a new holding at `price`.
    /// A negative delta reduces the position, leaving the average untouched;
    /// reaching exactly zero removes the holding entirely. Selling an unheld
    /// symbol or more shares than held is rejected and changes nothing.
    pub fn update_holding(
        &mut self,
        symbol: &str,
        delta_shares: i64,
        price: f64,
    ) -> Result<(), PortfolioError> {
        if delta_shares == 0 {
            return Ok(());
        }

        let position = self.holdings.iter().position(|h| h.symbol == symbol);

        if delta_shares > 0 {
            match position {
                Some(idx) => {
                    let holding = &mut self.holdings[idx];
                    let total_shares = holding.shares + delta_shares;
                    let total_cost_basis = holding.shares as f64 * holding.avg_purchase_price
                        + delta_shares as f64 * price;
                    holding.avg_purchase_price = total_cost_basis / total_shares as f64;
                    holding.shares = total_shares;
                }
                None => self.holdings.push(Holding {
                    symbol: symbol.to_string(),
                    shares: delta_shares,
                    avg_purchase_price: price,
                }),
            }
            return Ok(());
        }

        let requested = -delta_shares;
        let Some(idx) = position else {
            return Err(PortfolioError::InsufficientShares {
                symbol: symbol.to_string(),
                requested,
                held: 0,
            });
        };

        let held = self.holdings[idx].shares;
        if requested > held {
            return Err(PortfolioError::InsufficientShares {
                symbol: symbol.to_string(),
                requested,
                held,
            });
        }

        if requested == held {
            self.holdings.remove(idx);
        } else {
            self.holdings[idx].shares = held - requested;
        }
        Ok(())
    }

    /// Executes a buy: funds check, holding merge, then the cash debit as a
    /// separate step. The average purchase price is never adjusted on sells,
    /// only recomputed here.
    pub fn apply_buy(
        &mut self,
        symbol: &str,
        shares: i64,
        price: f64,
    ) -> Result<(), PortfolioError> {
        let cost = shares as f64 * price;
        if cost > self.cash_balance {
            return Err(PortfolioError::InsufficientFunds {
                cost,
                available: self.cash_balance,
            });
        }
        self.update_holding(symbol, shares, price)?;
        self.cash_balance -= cost;
        Ok(())
    }

    /// Executes a sell: share check via the holding merge, then the proceeds
    /// are credited to cash.
    pub fn apply_sell(
        &mut self,
        symbol: &str,
        shares: i64,
        price: f64,
    ) -> Result<(), PortfolioError> {
        self.update_holding(symbol, -shares, price)?;
        self.cash_balance += shares as f64 * price;
        Ok(())
    }
}
