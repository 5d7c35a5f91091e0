//! Application startup and lifecycle management.

use crate::config::{AttractionsConfig, CorsConfig, MongoConfig};
use crate::handlers;
use crate::services::{AttractionStore, MongoDb};
use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// `store` is `None` when no database was configured or the client could not
/// be built; the probes still answer in that case.
#[derive(Clone)]
pub struct AppState {
    pub config: AttractionsConfig,
    pub store: Option<Arc<dyn AttractionStore>>,
}

impl AppState {
    pub fn new(config: AttractionsConfig, store: Option<Arc<dyn AttractionStore>>) -> Self {
        Self { config, store }
    }

    pub fn store(&self) -> Result<&Arc<dyn AttractionStore>, AppError> {
        self.store.as_ref().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Database not available. Check DATABASE_URL and DATABASE_NAME environment variables."
            ))
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/", get(handlers::root))
        .route("/test", get(handlers::diagnostics))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/api/attractions", post(handlers::create_attraction))
        .route("/api/attractions/search", post(handlers::search_attractions))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the MongoDB handle when both settings are present. Failures are
/// logged and leave the service running without a store.
pub async fn connect_store(mongodb: &MongoConfig) -> Option<Arc<dyn AttractionStore>> {
    let (Some(uri), Some(database)) = (mongodb.uri.as_deref(), mongodb.database.as_deref())
    else {
        tracing::warn!("DATABASE_URL or DATABASE_NAME not set; running without a database");
        return None;
    };

    let db = match MongoDb::connect(uri, database).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            return None;
        }
    };

    if let Err(e) = db.initialize_indexes().await {
        tracing::warn!("Failed to initialize database indexes: {}", e);
    }

    Some(Arc::new(db))
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, connecting to MongoDB if it is configured.
    pub async fn build(config: AttractionsConfig) -> Result<Self, AppError> {
        let store = connect_store(&config.mongodb).await;
        Self::build_with_store(config, store).await
    }

    /// Build the application around an already constructed store.
    pub async fn build_with_store(
        config: AttractionsConfig,
        store: Option<Arc<dyn AttractionStore>>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, store),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = build_router(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
