//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize all subsystems in dependency order
//! - Start background tasks (disk sampler, metrics endpoint)
//! - Bind listeners and begin accepting traffic

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::util::TryInitError;

use crate::config::{load_config, AppConfig, ConfigError, CONFIG_PATH_ENV};
use crate::http::{HttpServer, ServerError};
use crate::observability::{logging, metrics, DiskSampler, Telemetry, TelemetryError, Tracing};

/// Anything that stops the process from coming up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] TryInitError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("could not start web server on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Bring the whole process up and serve until Ctrl+C.
pub fn run() -> Result<(), StartupError> {
    let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = load_config(path.as_deref())?;
    logging::init(&config.observability)?;

    tracing::info!(
        service = %config.service.name,
        bind_address = %config.listener.bind_address,
        "Initializing the server"
    );

    let tracer_provider = Tracing::init(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve(config, tracer_provider.clone()));
    drop(runtime);

    tracer_provider.shutdown();
    result
}

/// Start metrics, the disk sampler and the HTTP server. Must run inside a Tokio runtime.
pub async fn serve(config: AppConfig, tracer_provider: Tracing) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr).map_err(TelemetryError::from)?;
    }

    // Gauge handles bind to the recorder installed above.
    let telemetry = Telemetry::new(tracer_provider, &config.service);

    let disk_path = match &config.observability.disk_path {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    let sampler = DiskSampler::new(
        disk_path,
        Duration::from_secs(config.observability.disk_interval_secs),
        telemetry.gauges.clone(),
    );
    tokio::spawn(sampler.run());

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let server = HttpServer::new(config, telemetry)?;
    server.run(listener).await?;
    Ok(())
}
