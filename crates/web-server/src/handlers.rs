use crate::auth::AuthUser;
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use core_types::{InstrumentUpdate, NewInstrument};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub shares: i64,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub interval: Option<String>,
    pub output_size: Option<String>,
}

// ==============================================================================
// Accounts
// ==============================================================================

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = state
        .accounts
        .register(&body.username, &body.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "user added", "username": user.username })),
    ))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DeleteUserRequest>,
) -> Result<Json<Value>, AppError> {
    state.accounts.delete(&body.username).await?;
    Ok(Json(json!({ "status": "user deleted" })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = state
        .accounts
        .verify_credentials(&body.username, &body.password)
        .await?;
    let token = state.tokens.issue(user_id)?;
    Ok(Json(json!({ "status": "success", "token": token })))
}

/// Sessions are stateless tokens, so logout is a client-side concern; the
/// endpoint exists so clients have a uniform call to clear their session.
pub async fn logout() -> Json<Value> {
    Json(json!({ "status": "logged out" }))
}

// ==============================================================================
// Instrument ledger
// ==============================================================================

pub async fn add_stock(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewInstrument>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let instrument = state.ledger.add_instrument(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "stock": instrument })),
    ))
}

pub async fn update_stock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<InstrumentUpdate>,
) -> Result<Json<Value>, AppError> {
    if update.is_empty() {
        return Err(AppError::Validation(
            "No valid fields provided for update.".to_string(),
        ));
    }
    let instrument = state.ledger.update_instrument(id, update).await?;
    Ok(Json(json!({ "status": "success", "stock": instrument })))
}

pub async fn delete_stock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.ledger.delete_instrument(id).await?;
    Ok(Json(json!({ "status": "success" })))
}

pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, AppError> {
    let instrument = state.ledger.get_by_symbol(&symbol.to_uppercase()).await?;
    Ok(Json(json!({ "status": "success", "stock": instrument })))
}

pub async fn portfolio_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Value>, AppError> {
    let sort_by = query.sort_by.as_deref().unwrap_or("value");
    let entries = state.ledger.leaderboard(sort_by).await?;
    Ok(Json(
        json!({ "status": "success", "leaderboard": entries, "sorted_by": sort_by }),
    ))
}

// ==============================================================================
// Market data
// ==============================================================================

pub async fn fetch_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, AppError> {
    let symbol = symbol.to_uppercase();
    let price = state.quotes.get_price(&symbol).await?;
    let info = state.quotes.get_info(&symbol).await;
    Ok(Json(json!({
        "status": "success",
        "symbol": symbol,
        "price": price,
        "info": info,
    })))
}

pub async fn historical_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let symbol = symbol.to_uppercase();
    let interval = query.interval.as_deref().unwrap_or("1d");
    let output_size = query.output_size.as_deref().unwrap_or("compact");
    let bars = state
        .quotes
        .get_history(&symbol, interval, output_size)
        .await?;
    Ok(Json(json!({
        "status": "success",
        "symbol": symbol,
        "interval": interval,
        "history": bars,
    })))
}

pub async fn update_prices(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let report = state.refresher.refresh_all_prices().await?;
    Ok(Json(json!({ "status": "success", "result": report })))
}

// ==============================================================================
// Simulated trading
// ==============================================================================

pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let report = state.engine.get_portfolio(user.user_id).await?;
    Ok(Json(json!({ "status": "success", "portfolio": report })))
}

pub async fn buy_stock(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<TradeRequest>,
) -> Result<Json<Value>, AppError> {
    let symbol = body.symbol.to_uppercase();
    // First trade for a user creates the portfolio with its starting cash.
    state.engine.get_or_init(user.user_id).await?;
    // Trades always execute at the live price.
    let price = state.quotes.get_price(&symbol).await?;
    let portfolio = state
        .engine
        .buy(user.user_id, &symbol, body.shares, price)
        .await?;
    Ok(Json(json!({
        "status": "success",
        "symbol": symbol,
        "shares": body.shares,
        "price": price,
        "cash_balance": portfolio.cash_balance,
    })))
}

pub async fn sell_stock(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<TradeRequest>,
) -> Result<Json<Value>, AppError> {
    let symbol = body.symbol.to_uppercase();
    state.engine.get_or_init(user.user_id).await?;
    let price = state.quotes.get_price(&symbol).await?;
    let portfolio = state
        .engine
        .sell(user.user_id, &symbol, body.shares, price)
        .await?;
    Ok(Json(json!({
        "status": "success",
        "symbol": symbol,
        "shares": body.shares,
        "price": price,
        "cash_balance": portfolio.cash_balance,
    })))
}
