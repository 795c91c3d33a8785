//! HTTP handlers and their shared state

pub mod card;
pub mod customer;

use crate::core::error::{ApiError, ApiResult};
use crate::core::{CardService, CustomerService};
use crate::server::response::ErrorBody;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerService>,
    pub cards: Arc<CardService>,
    pub error_body: ErrorBody,
}

/// Parse a numeric path segment
///
/// Non-numeric input is a consistency failure, not a routing error, so it
/// gets the same 400 response as any other invalid input.
pub(crate) fn parse_id(raw: &str) -> ApiResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::invalid(format!("Invalid id '{}': expected an integer", raw)))
}

/// Map a body that failed to deserialize to a consistency failure
pub(crate) fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::invalid(format!("Invalid request body: {}", rejection.body_text()))
}
