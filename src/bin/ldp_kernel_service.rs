//! LDP Kernel Service Binary
//!
//! Runs the record container as a REST API service:
//! - Structured JSON logging
//! - Request tracing with correlation IDs (`X-Request-Id`, echoed back)
//! - Graceful shutdown handling
//! - Health check endpoints
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PORT`: Service port (default: 8080)
//! - `HOST`: Service host (default: 0.0.0.0)
//! - `PUBLIC_BASE_URL`: Base of minted record IRIs (default: http://localhost:{PORT})
//! - `LOCK_TIMEOUT_MS`: Bound on store lock waits (default: unbounded)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! PUBLIC_BASE_URL=https://bugs.example.com cargo run --bin ldp_kernel_service --features service
//! ```

use std::net::SocketAddr;

use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use ldp_kernel::service::{
    create_router, metrics_middleware, request_id_middleware, ServiceConfig, ServiceState,
};

const DEFAULT_LOG_FILTER: &str = "ldp_kernel_service=info,ldp_kernel=info,tower_http=info";

/// Pick the log line layout from `LOG_FORMAT`.
///
/// `pretty` is for a terminal. Anything else logs one JSON object per line
/// with the enclosing request span attached.
fn log_layer(log_format: &str) -> Box<dyn Layer<Registry> + Send + Sync> {
    match log_format {
        "pretty" => fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        _ => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    }
}

fn init_tracing(log_format: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(log_layer(log_format))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env();
    init_tracing(&config.log_format);

    let version = env!("CARGO_PKG_VERSION");
    let build_sha = option_env!("BUILD_SHA").unwrap_or("dev");

    info!(
        version = version,
        build_sha = build_sha,
        "Starting LDP Kernel Service"
    );

    let state = ServiceState::from_config(&config);
    info!(
        container = %state.container_uri(),
        lock_timeout_ms = config.lock_timeout.map(|d| d.as_millis() as u64),
        "Resource store initialized"
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        address = %addr,
        version = version,
        "LDP Kernel Service listening"
    );

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
            _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
        }
    };

    info!("Ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("LDP Kernel Service shutdown complete");

    Ok(())
}
