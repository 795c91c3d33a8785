//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::response::ErrorBody;
use super::router::{build_api_routes, build_health_routes};
use crate::config::ApiConfig;
use crate::core::store::{CardStore, CustomerStore};
use crate::core::{CardService, CustomerService};
use crate::storage::{InMemoryCardStore, InMemoryCustomerStore};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder wiring stores into services and services into routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_in_memory_stores()
///     .build()?;
/// ```
pub struct ServerBuilder {
    customer_store: Option<Arc<dyn CustomerStore>>,
    card_store: Option<Arc<dyn CardStore>>,
    api: ApiConfig,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            customer_store: None,
            card_store: None,
            api: ApiConfig::default(),
        }
    }

    /// Set the customer store (required)
    pub fn with_customer_store(mut self, store: impl CustomerStore + 'static) -> Self {
        self.customer_store = Some(Arc::new(store));
        self
    }

    /// Set the card store (required)
    pub fn with_card_store(mut self, store: impl CardStore + 'static) -> Self {
        self.card_store = Some(Arc::new(store));
        self
    }

    /// Use fresh in-memory stores for both customers and cards
    pub fn with_in_memory_stores(self) -> Self {
        self.with_customer_store(InMemoryCustomerStore::new())
            .with_card_store(InMemoryCardStore::new())
    }

    /// Set the API behaviour
    pub fn with_api_config(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Build the services and the state handed to handlers
    pub fn build_state(&self) -> Result<AppState> {
        let customer_store = self.customer_store.clone().ok_or_else(|| {
            anyhow::anyhow!("CustomerStore is required. Call .with_customer_store()")
        })?;
        let card_store = self
            .card_store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("CardStore is required. Call .with_card_store()"))?;

        Ok(AppState {
            customers: Arc::new(CustomerService::new(customer_store.clone())),
            cards: Arc::new(CardService::new(card_store, customer_store)),
            error_body: ErrorBody::from_flag(self.api.expose_error_details),
        })
    }

    /// Build the final REST router
    ///
    /// Every route accepts cross-origin requests from any origin and is
    /// traced by `tower-http`.
    pub fn build(self) -> Result<Router> {
        let state = self.build_state()?;
        let app = build_health_routes().merge(build_api_routes(state));

        Ok(app
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_customer_store_fails() {
        let result = ServerBuilder::new()
            .with_card_store(InMemoryCardStore::new())
            .build();
        let err = result.err().expect("missing customer store should fail");
        assert!(err.to_string().contains("CustomerStore is required"));
    }

    #[test]
    fn test_build_without_card_store_fails() {
        let result = ServerBuilder::new()
            .with_customer_store(InMemoryCustomerStore::new())
            .build();
        let err = result.err().expect("missing card store should fail");
        assert!(err.to_string().contains("CardStore is required"));
    }

    #[test]
    fn test_build_with_in_memory_stores() {
        assert!(ServerBuilder::new().with_in_memory_stores().build().is_ok());
    }

    #[test]
    fn test_error_body_follows_api_config() {
        let state = ServerBuilder::new()
            .with_in_memory_stores()
            .with_api_config(ApiConfig {
                expose_error_details: true,
            })
            .build_state()
            .unwrap();
        assert_eq!(state.error_body, ErrorBody::Details);
    }
}
