//! # Web Server
//!
//! The HTTP surface of the application. Routes are thin: each handler
//! deserializes the request, calls one domain component from the shared
//! `AppState`, and maps the outcome through `AppError` onto a JSON response.

use accounts::{AccountService, TokenIssuer};
use configuration::Settings;
use database::{PgAccountStore, PgInstrumentStore, PgPortfolioStore};
use ledger::InstrumentLedger;
use portfolio::PortfolioEngine;
use price_cache::MemoryCache;
use quote_client::{AlphaVantageClient, QuoteClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use valuation::PriceRefresher;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::AppError;

/// The shared application state that all handlers can access. Every
/// collaborator sits behind an `Arc` (and the stores behind traits), so the
/// same router runs against Postgres in production and in-memory fakes in
/// tests.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<InstrumentLedger>,
    pub engine: Arc<PortfolioEngine>,
    pub accounts: Arc<AccountService>,
    pub quotes: Arc<dyn QuoteClient>,
    pub refresher: Arc<PriceRefresher>,
    pub tokens: TokenIssuer,
}

/// Builds the full application router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/health",
            get(|| async { axum::Json(serde_json::json!({ "status": "healthy" })) }),
        )
        // --- Accounts ---
        .route("/api/create-user", post(handlers::create_user))
        .route("/api/delete-user", delete(handlers::delete_user))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        // --- Instrument ledger ---
        .route("/api/add-stock", post(handlers::add_stock))
        .route("/api/update-stock/:id", put(handlers::update_stock))
        .route("/api/delete-stock/:id", delete(handlers::delete_stock))
        .route("/api/get-stock/:symbol", get(handlers::get_stock))
        .route(
            "/api/portfolio-leaderboard",
            get(handlers::portfolio_leaderboard),
        )
        // --- Market data ---
        .route("/api/fetch-stock/:symbol", get(handlers::fetch_stock))
        .route(
            "/api/historical-stock/:symbol",
            get(handlers::historical_stock),
        )
        .route("/api/update-prices", post(handlers::update_prices))
        // --- Simulated trading ---
        .route("/api/portfolio", get(handlers::get_portfolio))
        .route("/api/buy-stock", post(handlers::buy_stock))
        .route("/api/sell-stock", post(handlers::sell_stock))
        .with_state(state)
}

/// Wires the production dependency graph from configuration: Postgres-backed
/// stores, the in-process price cache, and the live quote provider.
pub async fn bootstrap(settings: &Settings) -> anyhow::Result<Arc<AppState>> {
    let pool = database::connect().await?;
    database::run_migrations(&pool).await?;

    let quotes: Arc<dyn QuoteClient> = Arc::new(AlphaVantageClient::new(&settings.provider)?);
    let ledger = Arc::new(InstrumentLedger::new(
        Arc::new(PgInstrumentStore::new(pool.clone())),
        Arc::new(MemoryCache::new()),
    ));
    let engine = Arc::new(PortfolioEngine::new(
        Arc::new(PgPortfolioStore::new(pool.clone())),
        quotes.clone(),
        settings.trading.starting_cash,
    ));
    let accounts = Arc::new(AccountService::new(Arc::new(PgAccountStore::new(pool))));
    let refresher = Arc::new(PriceRefresher::new(ledger.clone(), quotes.clone()));
    let tokens = TokenIssuer::new(&settings.auth.jwt_secret, settings.auth.token_ttl_hours);

    Ok(Arc::new(AppState {
        ledger,
        engine,
        accounts,
        quotes,
        refresher,
        tokens,
    }))
}

/// The main function to configure and run the web server.
pub async fn run_server(settings: &Settings, addr: SocketAddr) -> anyhow::Result<()> {
    let state = bootstrap(settings).await?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    let app = build_router(state)
        .layer(cors)
        // This middleware will automatically log information about every
        // incoming request.
        .layer(TraceLayer::new_for_http());

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
