//! Customer HTTP handlers

use super::{AppState, invalid_body, parse_id};
use crate::core::Customer;
use crate::server::response::respond;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::Response,
};

/// GET /api/cliente/{id}
pub async fn find_customer_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    tracing::info!(id = %id, "Controller: looking up customer by id");

    let result = match parse_id(&id) {
        Ok(id) => state.customers.find_by_id(id).await,
        Err(err) => Err(err),
    };

    respond("find_customer_by_id", result, state.error_body)
}

/// GET /api/cliente/cpf/{cpf}
pub async fn find_customer_by_cpf(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Response {
    tracing::info!(cpf = %cpf, "Controller: looking up customer by CPF");

    let result = state.customers.find_by_cpf(&cpf).await;

    respond("find_customer_by_cpf", result, state.error_body)
}

/// POST /api/cliente
pub async fn save_customer(
    State(state): State<AppState>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Response {
    let result = match payload {
        Ok(Json(customer)) => {
            tracing::info!(
                id = ?customer.id,
                cpf = ?customer.cpf,
                name = ?customer.name,
                state = ?customer.state,
                "Controller: saving customer"
            );
            state.customers.save(customer).await
        }
        Err(rejection) => {
            tracing::info!("Controller: saving customer");
            Err(invalid_body(rejection))
        }
    };

    respond("save_customer", result, state.error_body)
}
