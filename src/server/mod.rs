//! Server module for building the HTTP API
//!
//! This module provides a `ServerBuilder` that wires stores into services and
//! registers:
//! - Customer routes under `/api/cliente`
//! - Card routes under `/api/cartao`
//! - Health check routes

pub mod builder;
pub mod handlers;
pub mod response;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use response::{ErrorBody, respond};
