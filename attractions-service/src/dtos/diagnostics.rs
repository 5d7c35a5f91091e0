use serde::{Deserialize, Serialize};

/// Body of `GET /test`. Every field is a human-readable status string; the
/// endpoint never reports configuration values themselves.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}
