//! Route table for the REST API

use super::handlers::card::{find_card_by_number, find_cards_by_customer, save_card};
use super::handlers::customer::{find_customer_by_cpf, find_customer_by_id, save_customer};
use super::handlers::AppState;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

/// Build the customer and card routes
///
/// - POST /api/cliente - Save a customer (insert or update)
/// - GET /api/cliente/{id} - Get a customer by id
/// - GET /api/cliente/cpf/{cpf} - Get a customer by CPF
/// - POST /api/cartao - Save a card (insert or update)
/// - GET /api/cartao/cliente/{cliente_id} - List the cards of a customer
/// - GET /api/cartao/numero/{numero} - Get a card by number
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/cliente", post(save_customer))
        .route("/api/cliente/{id}", get(find_customer_by_id))
        .route("/api/cliente/cpf/{cpf}", get(find_customer_by_cpf))
        .route("/api/cartao", post(save_card))
        .route("/api/cartao/cliente/{cliente_id}", get(find_cards_by_customer))
        .route("/api/cartao/numero/{numero}", get(find_card_by_number))
        .with_state(state)
}

/// Build the health check route
pub fn build_health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME")
    }))
}
