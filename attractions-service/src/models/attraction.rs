use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Collection holding attraction records.
pub const ATTRACTION_COLLECTION: &str = "attraction";

/// A tourism point of interest as accepted by the create endpoint.
///
/// The storage layer assigns `_id`; it is never part of the inbound payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Attraction {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: String,
    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

#[allow(clippy::ptr_arg)]
fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.is_empty()) {
        let mut err = ValidationError::new("empty_tag");
        err.message = Some("Tags cannot be empty strings".into());
        return Err(err);
    }
    Ok(())
}

/// Renders a storage identifier as the string clients see.
pub fn normalize_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replaces the storage `_id` with a string `id`, leaving every other field
/// as stored, and converts the record to relaxed extended JSON.
pub fn normalize_document(mut doc: Document) -> serde_json::Value {
    if let Some(raw_id) = doc.remove("_id") {
        doc.insert("id", normalize_id(&raw_id));
    }
    Bson::Document(doc).into_relaxed_extjson()
}
