//! # Portfolio Engine
//!
//! Per-user holdings and cash balances for simulated trading: buy/sell
//! execution, volume-weighted average-cost recomputation, valuation and
//! gain/loss reporting. The engine takes its collaborators (document store,
//! quote provider) as constructor arguments so tests can substitute fakes.

pub mod engine;
pub mod error;
pub mod model;
pub mod store;
pub mod testing;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{HoldingReport, PortfolioEngine, PortfolioReport};
pub use error::PortfolioError;
pub use model::{Holding, Portfolio};
pub use store::PortfolioStore;
