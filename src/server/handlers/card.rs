//! Card HTTP handlers

use super::{AppState, invalid_body, parse_id};
use crate::core::Card;
use crate::server::response::respond;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::Response,
};

/// GET /api/cartao/cliente/{cliente_id}
///
/// A customer without cards yields `200 []`.
pub async fn find_cards_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Response {
    tracing::info!(customer_id = %customer_id, "Controller: listing cards of customer");

    let result = match parse_id(&customer_id) {
        Ok(customer_id) => state.cards.find_by_customer_id(customer_id).await,
        Err(err) => Err(err),
    };

    respond("find_cards_by_customer", result, state.error_body)
}

/// GET /api/cartao/numero/{numero}
pub async fn find_card_by_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Response {
    tracing::info!(number = %number, "Controller: looking up card by number");

    let result = state.cards.find_by_number(&number).await;

    respond("find_card_by_number", result, state.error_body)
}

/// POST /api/cartao
pub async fn save_card(
    State(state): State<AppState>,
    payload: Result<Json<Card>, JsonRejection>,
) -> Response {
    let result = match payload {
        Ok(Json(card)) => {
            tracing::info!(
                id = ?card.id,
                number = ?card.number,
                customer_id = ?card.customer_id,
                "Controller: saving card"
            );
            state.cards.save(card).await
        }
        Err(rejection) => {
            tracing::info!("Controller: saving card");
            Err(invalid_body(rejection))
        }
    };

    respond("save_card", result, state.error_body)
}
