//! `GET /test`: a capability probe that degrades instead of failing.
//!
//! The probe runs even when the store is the thing that is broken, so every
//! outcome, including a panic inside the store, becomes a status string in a
//! 200 response.

use crate::config::MongoConfig;
use crate::dtos::DiagnosticsResponse;
use crate::services::AttractionStore;
use crate::startup::AppState;
use axum::{extract::State, Json};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

const MAX_COLLECTIONS: usize = 10;
const MAX_REASON_CHARS: usize = 50;

/// What the probe learned about the storage handle.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseProbe {
    /// No handle was built at startup.
    Missing,
    /// The handle enumerated its collections.
    Working { collections: Vec<String> },
    /// The handle exists but could not enumerate collections.
    Degraded { reason: String },
    /// The probe itself blew up.
    Faulted { reason: String },
}

impl DatabaseProbe {
    pub fn database_status(&self) -> String {
        match self {
            DatabaseProbe::Missing => "❌ Not Available".to_string(),
            DatabaseProbe::Working { .. } => "✅ Connected & Working".to_string(),
            DatabaseProbe::Degraded { reason } => {
                format!("⚠️  Connected but Error: {}", truncate(reason))
            }
            DatabaseProbe::Faulted { reason } => format!("❌ Error: {}", truncate(reason)),
        }
    }

    pub fn connection_status(&self) -> &'static str {
        match self {
            DatabaseProbe::Missing => "Not Connected",
            // A handle exists in every other state, even when using it failed.
            _ => "Connected",
        }
    }

    pub fn collections(&self) -> Vec<String> {
        match self {
            DatabaseProbe::Working { collections } => collections.clone(),
            _ => Vec::new(),
        }
    }
}

pub async fn probe_database(store: Option<&Arc<dyn AttractionStore>>) -> DatabaseProbe {
    let Some(store) = store else {
        return DatabaseProbe::Missing;
    };

    let outcome = AssertUnwindSafe(store.list_collection_names())
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(mut collections)) => {
            collections.truncate(MAX_COLLECTIONS);
            DatabaseProbe::Working { collections }
        }
        Ok(Err(e)) => DatabaseProbe::Degraded {
            reason: e.to_string(),
        },
        Err(panic) => DatabaseProbe::Faulted {
            reason: panic_message(panic.as_ref()),
        },
    }
}

pub fn render(probe: &DatabaseProbe, mongodb: &MongoConfig) -> DiagnosticsResponse {
    DiagnosticsResponse {
        backend: "✅ Running".to_string(),
        database: probe.database_status(),
        database_url: presence(&mongodb.uri),
        database_name: presence(&mongodb.database),
        connection_status: probe.connection_status().to_string(),
        collections: probe.collections(),
    }
}

pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let probe = probe_database(state.store.as_ref()).await;
    if !matches!(probe, DatabaseProbe::Working { .. }) {
        tracing::warn!(probe = ?probe, "Database probe did not succeed");
    }
    Json(render(&probe, &state.config.mongodb))
}

fn presence(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => "✅ Set".to_string(),
        _ => "❌ Not Set".to_string(),
    }
}

fn truncate(reason: &str) -> String {
    reason.chars().take(MAX_REASON_CHARS).collect()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
