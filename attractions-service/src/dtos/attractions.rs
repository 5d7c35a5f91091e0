use serde::{Deserialize, Serialize};
use validator::Validate;

/// Search parameters. Every field is optional; an empty string counts as absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttractionQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Limit must be at least 1"))]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAttractionResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttractionListResponse {
    pub items: Vec<serde_json::Value>,
}
