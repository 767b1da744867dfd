//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing)
//! - Build the loopback child caller and fan-out engine
//! - Bind server to listener
//!
//! # Design Decisions
//! - No request timeout layer: `/fib` waits on its children for as long as
//!   they take

use std::sync::Arc;

use axum::{routing::any, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use url::Url;

use crate::admin;
use crate::config::AppConfig;
use crate::fib::{ChildCaller, FanOutEngine, HttpChildCaller};
use crate::http::handlers;
use crate::observability::Telemetry;

/// Failures while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid self url: {0}")]
    SelfUrl(#[from] url::ParseError),

    #[error("failed to build child HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub engine: FanOutEngine,
    pub telemetry: Telemetry,
}

/// HTTP server for the fan-out service.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server whose children are loopback calls to `fanout.self_url`.
    pub fn new(config: AppConfig, telemetry: Telemetry) -> Result<Self, ServerError> {
        let base = Url::parse(&config.fanout.self_url)?;
        let caller = HttpChildCaller::new(base, telemetry.propagator.clone())?;
        Ok(Self::with_caller(config, telemetry, Arc::new(caller)))
    }

    /// Create a server with an explicit child caller.
    pub fn with_caller(
        config: AppConfig,
        telemetry: Telemetry,
        caller: Arc<dyn ChildCaller>,
    ) -> Self {
        let engine = FanOutEngine::new(caller, telemetry.tracing.tracer().clone());
        let state = AppState { engine, telemetry };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/fib", any(handlers::fib))
            .route("/favicon.ico", any(handlers::favicon))
            .merge(admin::router())
            .fallback(handlers::root)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            self_url = %self.config.fanout.self_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
