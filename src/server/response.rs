//! Error-to-response mapping shared by every handler
//!
//! Handlers never build failure responses themselves: they hand their
//! `ApiResult` to [`respond`], which logs the failure and picks the status
//! and body in one place.

use crate::core::error::{ApiError, ApiResult};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// What a failure response carries in its body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorBody {
    /// The default (empty) payload of the endpoint, e.g. `{}` or `[]`
    #[default]
    EmptyPayload,
    /// A structured `{"code": ..., "message": ...}` body
    Details,
}

impl ErrorBody {
    pub fn from_flag(expose_details: bool) -> Self {
        if expose_details {
            ErrorBody::Details
        } else {
            ErrorBody::EmptyPayload
        }
    }
}

/// Turn a service result into an HTTP response
///
/// `Ok` becomes `200` with the value as JSON. Errors go through
/// [`error_response`].
pub fn respond<T>(operation: &'static str, result: ApiResult<T>, body: ErrorBody) -> Response
where
    T: Serialize + Default,
{
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => error_response::<T>(operation, &err, body),
    }
}

/// Log `err` and build its response
///
/// Consistency failures log at info and answer 400; anything else logs at
/// error and answers 500.
pub fn error_response<T>(operation: &'static str, err: &ApiError, body: ErrorBody) -> Response
where
    T: Serialize + Default,
{
    if err.is_consistency() {
        tracing::info!(operation, code = err.error_code(), "Data inconsistency: {}", err);
    } else {
        tracing::error!(operation, code = err.error_code(), "Application error: {}", err);
    }

    let status = err.status_code();
    match body {
        ErrorBody::EmptyPayload => (status, Json(T::default())).into_response(),
        ErrorBody::Details => (status, Json(err.to_response())).into_response(),
    }
}
