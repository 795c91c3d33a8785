//! HTTP-level tests for the card endpoints

use axum::http::StatusCode;
use axum_test::TestServer;
use cartoes::prelude::*;
use serde_json::{Value, json};

async fn make_server_with_customer() -> TestServer {
    let app = ServerBuilder::new().with_in_memory_stores().build().unwrap();
    let server = TestServer::new(app);

    server
        .post("/api/cliente")
        .json(&json!({"cpf": "12345678900", "nome": "Ana"}))
        .await
        .assert_status_ok();

    server
}

async fn create_card(server: &TestServer, number: &str) -> Value {
    let response = server
        .post("/api/cartao")
        .json(&json!({
            "numero": number,
            "dataValidade": "2030-12-31",
            "clienteId": 1
        }))
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_save_card() {
    let server = make_server_with_customer().await;

    let card = create_card(&server, "4111111111111111").await;

    assert_eq!(
        card,
        json!({
            "id": 1,
            "numero": "4111111111111111",
            "dataValidade": "2030-12-31",
            "bloqueado": false,
            "clienteId": 1
        })
    );
}

#[tokio::test]
async fn test_find_card_by_number() {
    let server = make_server_with_customer().await;
    let card = create_card(&server, "4111111111111111").await;

    let response = server.get("/api/cartao/numero/4111111111111111").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), card);
}

#[tokio::test]
async fn test_unknown_card_number_is_400_with_empty_body() {
    let server = make_server_with_customer().await;

    let response = server.get("/api/cartao/numero/4000000000000002").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({}));
}

#[tokio::test]
async fn test_list_cards_of_customer() {
    let server = make_server_with_customer().await;
    let first = create_card(&server, "4111111111111111").await;
    let second = create_card(&server, "5500000000000004").await;

    let response = server.get("/api/cartao/cliente/1").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([first, second]));
}

#[tokio::test]
async fn test_customer_without_cards_lists_empty() {
    let server = make_server_with_customer().await;

    let response = server.get("/api/cartao/cliente/1").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_unknown_customer_lists_empty() {
    let server = make_server_with_customer().await;

    let response = server.get("/api/cartao/cliente/42").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_invalid_customer_id_is_400_with_empty_list() {
    let server = make_server_with_customer().await;

    let response = server.get("/api/cartao/cliente/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_card_for_unknown_customer_is_400() {
    let server = make_server_with_customer().await;

    let response = server
        .post("/api/cartao")
        .json(&json!({
            "numero": "4111111111111111",
            "dataValidade": "2030-12-31",
            "clienteId": 99
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({}));
}

#[tokio::test]
async fn test_duplicate_card_number_is_400() {
    let server = make_server_with_customer().await;
    create_card(&server, "4111111111111111").await;

    let response = server
        .post("/api/cartao")
        .json(&json!({
            "numero": "4111111111111111",
            "dataValidade": "2031-01-31",
            "clienteId": 1
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_block_card_by_saving_with_id() {
    let server = make_server_with_customer().await;
    create_card(&server, "4111111111111111").await;

    let response = server
        .post("/api/cartao")
        .json(&json!({
            "id": 1,
            "numero": "4111111111111111",
            "dataValidade": "2030-12-31",
            "bloqueado": true,
            "clienteId": 1
        }))
        .await;
    response.assert_status_ok();

    let card: Value = server.get("/api/cartao/numero/4111111111111111").await.json();
    assert_eq!(card["bloqueado"], true);

    let cards: Value = server.get("/api/cartao/cliente/1").await.json();
    assert_eq!(cards.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_card_with_missing_fields_is_400() {
    let server = make_server_with_customer().await;

    let response = server
        .post("/api/cartao")
        .json(&json!({"numero": "4111"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({}));
}

#[tokio::test]
async fn test_bad_date_format_is_400() {
    let server = make_server_with_customer().await;

    let response = server
        .post("/api/cartao")
        .json(&json!({
            "numero": "4111111111111111",
            "dataValidade": "31/12/2030",
            "clienteId": 1
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
