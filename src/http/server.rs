//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Bind server to listener
//! - Graceful shutdown on ctrl-c

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::Router;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::chain::ChainClient;
use crate::config::ServiceConfig;
use crate::directory::PropertyDirectory;
use crate::http::handlers;
use crate::observability::metrics;
use crate::payments::PaymentLedger;
use crate::rentals::RentalManager;
use crate::settlement::SettlementCoordinator;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rentals: Arc<RentalManager>,
    pub payments: Arc<PaymentLedger>,
    pub coordinator: Arc<SettlementCoordinator<ChainClient>>,
    pub chain: Arc<ChainClient>,
    pub directory: Arc<PropertyDirectory>,
}

impl AppState {
    /// Wire the managers, ledger and coordinator around the given chain
    /// client and property directory.
    pub fn new(chain: ChainClient, directory: PropertyDirectory) -> Self {
        let rentals = Arc::new(RentalManager::new());
        let payments = Arc::new(PaymentLedger::new(rentals.clone()));
        let chain = Arc::new(chain);
        let coordinator = Arc::new(SettlementCoordinator::new(
            rentals.clone(),
            payments.clone(),
            chain.clone(),
        ));
        Self {
            rentals,
            payments,
            coordinator,
            chain,
            directory: Arc::new(directory),
        }
    }
}

/// HTTP server for the settlement service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and state.
    pub fn new(config: ServiceConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/rentals", post(handlers::create_rental))
            .route("/api/rentals/my-rentals", get(handlers::list_my_rentals))
            .route("/api/rentals/{id}", get(handlers::get_rental))
            .route(
                "/api/rentals/{id}/status",
                patch(handlers::update_rental_status),
            )
            .route("/api/payments", post(handlers::create_payment))
            .route("/api/payments/{id}", get(handlers::get_payment))
            .route(
                "/api/payments/rental/{rental_id}",
                get(handlers::list_payments_by_rental),
            )
            .route("/api/blockchain/block-number", get(handlers::block_number))
            .route("/api/blockchain/balance/{address}", get(handlers::balance))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Record method, status and latency for every request.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_http_request(&method, response.status().as_u16(), start);
    response
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
