//! End-to-end router tests over in-memory fakes. Each test drives the real
//! router with `tower::ServiceExt::oneshot`, so routing, extractors, status
//! mapping and response shapes are all exercised.

use accounts::{testing::MemoryAccountStore, AccountService, TokenIssuer};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use ledger::{testing::MemoryStore, InstrumentLedger};
use portfolio::{testing::MemoryPortfolioStore, PortfolioEngine};
use price_cache::MemoryCache;
use quote_client::testing::FixedQuotes;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use valuation::PriceRefresher;
use web_server::{build_router, AppState};

const STARTING_CASH: f64 = 10_000.0;

fn app_with_quotes(prices: &[(&str, f64)]) -> Router {
    let quotes = Arc::new(FixedQuotes::new(prices));
    let ledger = Arc::new(InstrumentLedger::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryCache::new()),
    ));
    let engine = Arc::new(PortfolioEngine::new(
        Arc::new(MemoryPortfolioStore::new()),
        quotes.clone(),
        STARTING_CASH,
    ));
    let accounts = Arc::new(AccountService::new(Arc::new(MemoryAccountStore::new())));
    let refresher = Arc::new(PriceRefresher::new(ledger.clone(), quotes.clone()));
    let tokens = TokenIssuer::new("test-secret", 24);

    build_router(Arc::new(AppState {
        ledger,
        engine,
        accounts,
        quotes,
        refresher,
        tokens,
    }))
}

fn app() -> Router {
    app_with_quotes(&[("AAPL", 150.0), ("GOOGL", 2800.0), ("TSLA", 700.0)])
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/create-user",
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let response = app().oneshot(get_request("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_user_then_duplicate_conflicts() {
    let app = app();
    let body = json!({ "username": "alice", "password": "hunter2" });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/create-user", body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "user added");
    assert_eq!(json["username"], "alice");

    let response = app
        .oneshot(json_request("POST", "/api/create-user", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let app = app();
    register_and_login(&app, "bob", "secret").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({ "username": "bob", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn portfolio_requires_a_valid_token() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get_request("/api/portfolio"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/portfolio")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn first_portfolio_access_initializes_starting_cash() {
    let app = app();
    let token = register_and_login(&app, "carol", "pw").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/portfolio")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["portfolio"]["cash_balance"], 10_000.0);
    assert_eq!(body["portfolio"]["total_portfolio_value"], 10_000.0);
    assert!(body["portfolio"]["holdings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn add_stock_validates_and_conflicts_on_duplicate() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/add-stock",
            json!({ "symbol": "AAPL", "name": "Apple Inc.", "quantity": 0, "buy_price": 150.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Quantity and buy price must be positive numbers.");

    let valid = json!({ "symbol": "AAPL", "name": "Apple Inc.", "quantity": 50, "buy_price": 150.0 });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/add-stock", valid.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["stock"]["symbol"], "AAPL");

    let response = app
        .oneshot(json_request("POST", "/api/add-stock", valid))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Instrument with symbol 'AAPL' already exists.");
}

#[tokio::test]
async fn update_stock_rejects_empty_body_and_unknown_id() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/update-stock/1", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/update-stock/999",
            json!({ "quantity": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_stock_uppercases_the_symbol() {
    let app = app();
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/add-stock",
            json!({ "symbol": "TSLA", "name": "Tesla, Inc.", "quantity": 5, "buy_price": 700.0 }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/api/get-stock/tsla"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["stock"]["symbol"], "TSLA");
}

#[tokio::test]
async fn leaderboard_defaults_to_value_and_rejects_bad_keys() {
    let app = app();
    for (symbol, name, quantity, buy_price) in [
        ("AAPL", "Apple Inc.", 50, 150.0),
        ("GOOGL", "Alphabet Inc.", 10, 2800.0),
    ] {
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/add-stock",
                json!({ "symbol": symbol, "name": name, "quantity": quantity, "buy_price": buy_price }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/portfolio-leaderboard"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sorted_by"], "value");
    let leaderboard = body["leaderboard"].as_array().unwrap();
    assert_eq!(leaderboard[0]["symbol"], "GOOGL");
    assert_eq!(leaderboard[0]["total_value"], 28_000.0);

    let response = app
        .oneshot(get_request("/api/portfolio-leaderboard?sort_by=alphabetical"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetch_stock_returns_price_or_bad_gateway() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get_request("/api/fetch-stock/aapl"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["price"], 150.0);
    assert_eq!(body["info"]["name"], "AAPL");

    let response = app
        .oneshot(get_request("/api/fetch-stock/BOGUS"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn buy_debits_cash_and_enforces_funds() {
    let app = app();
    let token = register_and_login(&app, "dave", "pw").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/buy-stock",
            &token,
            json!({ "symbol": "aapl", "shares": 10 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["price"], 150.0);
    assert_eq!(body["cash_balance"], 8_500.0);

    // 10 more GOOGL at 2800 would cost 28000 against 8500 cash.
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/buy-stock",
            &token,
            json!({ "symbol": "GOOGL", "shares": 10 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Insufficient funds."));
}

#[tokio::test]
async fn sell_credits_cash_and_rejects_unheld_symbols() {
    let app = app();
    let token = register_and_login(&app, "erin", "pw").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/sell-stock",
            &token,
            json!({ "symbol": "AAPL", "shares": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/buy-stock",
            &token,
            json!({ "symbol": "AAPL", "shares": 10 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/sell-stock",
            &token,
            json!({ "symbol": "AAPL", "shares": 4 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["cash_balance"], 8_500.0 + 4.0 * 150.0);

    // The remaining position shows up in the valued portfolio.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/portfolio")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    let holdings = body["portfolio"]["holdings"].as_array().unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0]["symbol"], "AAPL");
    assert_eq!(holdings[0]["shares"], 6);
}

#[tokio::test]
async fn update_prices_reports_per_symbol_outcomes() {
    let app = app_with_quotes(&[("AAPL", 151.0)]);
    for (symbol, name) in [("AAPL", "Apple Inc."), ("MISS", "Missing Corp.")] {
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/add-stock",
                json!({ "symbol": symbol, "name": name, "quantity": 5, "buy_price": 100.0 }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(json_request("POST", "/api/update-prices", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["updated"][0]["symbol"], "AAPL");
    assert_eq!(body["result"]["updated"][0]["current_price"], 151.0);
    assert_eq!(body["result"]["failed"][0]["symbol"], "MISS");
}

#[tokio::test]
async fn delete_user_removes_the_account() {
    let app = app();
    register_and_login(&app, "frank", "pw").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/delete-user",
            json!({ "username": "frank" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({ "username": "frank", "password": "pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
