//! Typed error handling for the customer/card service
//!
//! Every failure a request can run into is one of two kinds:
//!
//! - [`ConsistencyError`]: a business rule was violated or the requested row
//!   does not exist. Surfaced as `400 Bad Request`.
//! - Everything else ([`StorageError`], [`ApiError::Internal`]). Surfaced as
//!   `500 Internal Server Error`.
//!
//! Stores report absence as `Option::None`; it is the service layer that turns
//! absence into [`ConsistencyError::NotFound`], so handlers never unwrap.
//!
//! # Example
//!
//! ```rust,ignore
//! use cartoes::prelude::*;
//!
//! match service.find_by_id(42).await {
//!     Ok(customer) => println!("found {:?}", customer),
//!     Err(ApiError::Consistency(ConsistencyError::NotFound { .. })) => {
//!         println!("no such customer");
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// The main error type returned by services
#[derive(Debug, Error)]
pub enum ApiError {
    /// Business rule violation or missing row
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// Storage backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Anything that should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Structured error body, returned only when error details are exposed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Consistency(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Consistency(e) => e.error_code(),
            ApiError::Storage(e) => e.error_code(),
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this is a domain-consistency failure
    pub fn is_consistency(&self) -> bool {
        matches!(self, ApiError::Consistency(_))
    }

    /// Convert to a structured error body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }

    /// Shorthand for a not-found consistency failure
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        ApiError::Consistency(ConsistencyError::NotFound {
            entity,
            field,
            value: value.to_string(),
        })
    }

    /// Shorthand for an invalid-input consistency failure
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::Consistency(ConsistencyError::Invalid {
            message: message.into(),
        })
    }
}

// =============================================================================
// Consistency Errors
// =============================================================================

/// Domain-level failures, distinct from infrastructure errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// No row matches the lookup key
    #[error("No {entity} found with {field} '{value}'")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Input violates a business rule
    #[error("{message}")]
    Invalid { message: String },

    /// One or more payload fields failed validation
    #[error("Validation errors: {}", join_field_errors(.0))]
    Fields(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ConsistencyError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConsistencyError::NotFound { .. } => "NOT_FOUND",
            ConsistencyError::Invalid { .. } => "INVALID_INPUT",
            ConsistencyError::Fields(_) => "VALIDATION_ERROR",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by storage backends
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Could not reach the backend
    #[error("{backend} connection error: {message}")]
    Connection {
        backend: &'static str,
        message: String,
    },

    /// A query failed
    #[error("{backend} query failed: {message}")]
    Query {
        backend: &'static str,
        message: String,
    },

    /// A unique or foreign-key constraint rejected a write
    #[error("{backend} constraint '{constraint}' violated")]
    Constraint {
        backend: &'static str,
        constraint: String,
    },

    /// The backend's lock was poisoned by a panicking writer
    #[error("{backend} lock poisoned")]
    Poisoned { backend: &'static str },
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Connection { .. } => "STORAGE_CONNECTION_ERROR",
            StorageError::Query { .. } => "STORAGE_QUERY_ERROR",
            StorageError::Constraint { .. } => "STORAGE_CONSTRAINT_ERROR",
            StorageError::Poisoned { .. } => "STORAGE_LOCK_ERROR",
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for service operations
pub type ApiResult<T> = Result<T, ApiError>;

/// A specialized Result type for store operations
pub type StoreResult<T> = Result<T, StorageError>;
