//! # Cartoes API
//!
//! A REST service to look up customers and the cards they own.
//!
//! ## Layers
//!
//! - **Stores** ([`core::store`]): rows of customers and cards, one trait per
//!   table, with in-memory and PostgreSQL backends ([`storage`])
//! - **Services** ([`core::service`]): validation and the not-found /
//!   uniqueness rules
//! - **Handlers** ([`server`]): HTTP endpoints that delegate to services and
//!   map every failure through one response function
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cartoes::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_in_memory_stores()
//!         .serve("127.0.0.1:8080")
//!         .await
//! }
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path                              | Failure body |
//! |--------|-----------------------------------|--------------|
//! | GET    | `/api/cliente/{id}`               | `{}`         |
//! | GET    | `/api/cliente/cpf/{cpf}`          | `{}`         |
//! | POST   | `/api/cliente`                    | `{}`         |
//! | GET    | `/api/cartao/cliente/{clienteId}` | `[]`         |
//! | GET    | `/api/cartao/numero/{numero}`     | `{}`         |
//! | POST   | `/api/cartao`                     | `{}`         |
//!
//! Consistency failures (not found, invalid input) answer `400`; anything
//! else answers `500`.

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, ApiResult, Card, CardService, CardStore, ConsistencyError, Customer,
        CustomerService, CustomerStore, StorageError, StoreResult,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryCardStore, InMemoryCustomerStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::{PostgresCardStore, PostgresCustomerStore};

    // === Config ===
    pub use crate::config::{ApiConfig, AppConfig, StorageBackend};

    // === Server ===
    pub use crate::server::{AppState, ErrorBody, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
}
