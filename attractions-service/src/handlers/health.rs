use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, http::Uri, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Sindhudurg Tourism API is running" }))
}

/// Liveness. A missing store is reported as degraded, a failing one as
/// unhealthy.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let Some(store) = state.store.as_ref() else {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "degraded",
                "service": "attractions-service",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "not configured"
            })),
        );
    };

    match store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "attractions-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "attractions-service",
                "error": e.to_string()
            })),
        ),
    }
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.as_ref() {
        Some(store) => match store.ping().await {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        None => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}
