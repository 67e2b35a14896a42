// HTTP layer - axum router, handlers and error responses over the ledger service.

mod error;
mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::application::LedgerService;

pub use error::{ApiError, JournalError};

/// Shared state handed to every handler.
pub type AppState = Arc<LedgerService>;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the router with every endpoint and CORS open to all origins.
pub fn router(service: Arc<LedgerService>) -> Router {
    Router::new()
        .route("/api/initiate-transfer", post(handlers::initiate_transfer))
        .route("/api/balances", get(handlers::list_balances))
        .route("/transfer", post(handlers::record_journal_transfer))
        .route("/health", get(handlers::health_check))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Start the server and run until `shutdown_signal` resolves.
pub async fn serve_with_shutdown<F>(
    service: Arc<LedgerService>,
    config: ServerConfig,
    shutdown_signal: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(service);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Simulated Bank API running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
