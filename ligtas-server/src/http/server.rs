//! Axum server setup
//!
//! - Localhost-only CORS by default
//! - Tracing and request-timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, StatusCode};
use axum::Router;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use ligtas_core::SoilPredictor;

use super::routes;
use crate::db::migrations;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_permissive: false,
            timeout_secs: 30,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub pool: SqlitePool,
    /// Loaded once at startup, read-only afterwards
    pub predictor: SoilPredictor,
}

impl AppState {
    pub fn new(pool: SqlitePool, predictor: SoilPredictor) -> Arc<Self> {
        Arc::new(Self { pool, predictor })
    }
}

/// Build the router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        let port = config.bind_addr.port();
        let origins: Vec<HeaderValue> = [
            format!("http://localhost:{port}"),
            format!("http://127.0.0.1:{port}"),
        ]
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(&origin).ok())
        .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer(config.timeout_secs))
        .layer(cors);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::index::router())
        .merge(routes::locations::router())
        .merge(routes::add_location::router())
        .merge(routes::farms::router())
        .merge(routes::importance::router())
        .layer(middleware)
        .with_state(state)
}

/// Requests running past the limit get 408.
fn timeout_layer(timeout_secs: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(timeout_secs))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// Migrations run before the listener is bound.
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let predictor = SoilPredictor::new(SoilModel::load(model_path)?)?;
/// run_server(pool, predictor, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    pool: SqlitePool,
    predictor: SoilPredictor,
    config: ServerConfig,
) -> Result<(), ServerError> {
    migrations::run(&pool).await?;

    tracing::info!(
        trees = predictor.model().n_trees(),
        classes = predictor.model().n_classes(),
        "predictor ready"
    );

    let app = build_router(AppState::new(pool, predictor), &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database setup failed: {0}")]
    Database(#[from] sqlx::Error),
}
