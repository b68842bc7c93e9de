use accounts::{AccountError, AccountStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Instrument, NewInstrument, User};
use ledger::{InstrumentStore, LedgerError};
use portfolio::{Holding, Portfolio, PortfolioError, PortfolioStore};
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use sqlx::FromRow;

/// Row shape of the `instruments` table.
#[derive(Debug, Clone, FromRow)]
struct DbInstrument {
    id: i64,
    symbol: String,
    name: String,
    quantity: i64,
    buy_price: f64,
    current_price: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<DbInstrument> for Instrument {
    fn from(row: DbInstrument) -> Self {
        Instrument {
            id: row.id,
            symbol: row.symbol,
            name: row.name,
            quantity: row.quantity,
            buy_price: row.buy_price,
            current_price: row.current_price,
            created_at: row.created_at,
        }
    }
}

/// Row shape of the `portfolios` table; holdings are a JSONB array.
#[derive(Debug, Clone, FromRow)]
struct DbPortfolio {
    user_id: i64,
    cash_balance: f64,
    holdings: Json<Vec<Holding>>,
    version: i64,
}

impl From<DbPortfolio> for Portfolio {
    fn from(row: DbPortfolio) -> Self {
        Portfolio {
            user_id: row.user_id,
            cash_balance: row.cash_balance,
            holdings: row.holdings.0,
            version: row.version,
        }
    }
}

/// Row shape of the `users` table.
#[derive(Debug, Clone, FromRow)]
struct DbUser {
    id: i64,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

// ==============================================================================
// Instrument store
// ==============================================================================

/// Postgres-backed authoritative store for the instrument ledger.
#[derive(Debug, Clone)]
pub struct PgInstrumentStore {
    pool: PgPool,
}

impl PgInstrumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstrumentStore for PgInstrumentStore {
    async fn insert(&self, new: NewInstrument) -> Result<Instrument, LedgerError> {
        let row = sqlx::query_as::<_, DbInstrument>(
            r#"
            INSERT INTO instruments (symbol, name, quantity, buy_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, symbol, name, quantity, buy_price, current_price, created_at
            "#,
        )
        .bind(&new.symbol)
        .bind(&new.name)
        .bind(new.quantity)
        .bind(new.buy_price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::DuplicateSymbol(new.symbol.clone())
            } else {
                LedgerError::Backend(e.to_string())
            }
        })?;
        Ok(row.into())
    }

    async fn fetch(&self, id: i64) -> Result<Instrument, LedgerError> {
        sqlx::query_as::<_, DbInstrument>(
            "SELECT id, symbol, name, quantity, buy_price, current_price, created_at
             FROM instruments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Backend(e.to_string()))?
        .map(Instrument::from)
        .ok_or_else(|| LedgerError::id_not_found(id))
    }

    async fn fetch_by_symbol(&self, symbol: &str) -> Result<Instrument, LedgerError> {
        sqlx::query_as::<_, DbInstrument>(
            "SELECT id, symbol, name, quantity, buy_price, current_price, created_at
             FROM instruments WHERE symbol = $1",
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Backend(e.to_string()))?
        .map(Instrument::from)
        .ok_or_else(|| LedgerError::symbol_not_found(symbol))
    }

    async fn update(&self, instrument: &Instrument) -> Result<(), LedgerError> {
        let result = sqlx::query(
            "UPDATE instruments
             SET symbol = $2, name = $3, quantity = $4, buy_price = $5, current_price = $6
             WHERE id = $1",
        )
        .bind(instrument.id)
        .bind(&instrument.symbol)
        .bind(&instrument.name)
        .bind(instrument.quantity)
        .bind(instrument.buy_price)
        .bind(instrument.current_price)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::id_not_found(instrument.id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), LedgerError> {
        let result = sqlx::query("DELETE FROM instruments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::id_not_found(id));
        }
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Instrument>, LedgerError> {
        let rows = sqlx::query_as::<_, DbInstrument>(
            "SELECT id, symbol, name, quantity, buy_price, current_price, created_at
             FROM instruments ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Backend(e.to_string()))?;
        Ok(rows.into_iter().map(Instrument::from).collect())
    }
}

// ==============================================================================
// Portfolio store
// ==============================================================================

/// Postgres-backed document store for per-user portfolios.
#[derive(Debug, Clone)]
pub struct PgPortfolioStore {
    pool: PgPool,
}

impl PgPortfolioStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioStore for PgPortfolioStore {
    async fn find(&self, user_id: i64) -> Result<Option<Portfolio>, PortfolioError> {
        let row = sqlx::query_as::<_, DbPortfolio>(
            "SELECT user_id, cash_balance, holdings, version
             FROM portfolios WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortfolioError::Backend(e.to_string()))?;
        Ok(row.map(Portfolio::from))
    }

    async fn insert(&self, portfolio: &Portfolio) -> Result<(), PortfolioError> {
        sqlx::query(
            "INSERT INTO portfolios (user_id, cash_balance, holdings, version)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(portfolio.user_id)
        .bind(portfolio.cash_balance)
        .bind(Json(&portfolio.holdings))
        .bind(portfolio.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortfolioError::AlreadyExists(portfolio.user_id)
            } else {
                PortfolioError::Backend(e.to_string())
            }
        })?;
        Ok(())
    }

    async fn replace(&self, portfolio: &Portfolio) -> Result<(), PortfolioError> {
        // Compare-and-swap on the version column; a stale version writes
        // nothing and surfaces as a conflict.
        let result = sqlx::query(
            "UPDATE portfolios
             SET cash_balance = $2, holdings = $3, version = version + 1
             WHERE user_id = $1 AND version = $4",
        )
        .bind(portfolio.user_id)
        .bind(portfolio.cash_balance)
        .bind(Json(&portfolio.holdings))
        .bind(portfolio.version)
        .execute(&self.pool)
        .await
        .map_err(|e| PortfolioError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return match self.find(portfolio.user_id).await? {
                Some(_) => Err(PortfolioError::Conflict),
                None => Err(PortfolioError::NotFound),
            };
        }
        Ok(())
    }
}

// ==============================================================================
// Account store
// ==============================================================================

/// Postgres-backed user table.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, AccountError> {
        let row = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AccountError::UsernameTaken(username.to_string())
            } else {
                AccountError::Backend(e.to_string())
            }
        })?;
        Ok(row.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AccountError> {
        let row = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Backend(e.to_string()))?;
        Ok(row.map(User::from))
    }

    async fn delete_by_username(&self, username: &str) -> Result<(), AccountError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(username.to_string()));
        }
        Ok(())
    }
}
