//! Translation of search parameters into a MongoDB filter.
//!
//! `category` and `location` match the whole field case-insensitively, anchored
//! with `\A`/`\z` so a trailing newline in the stored value does not match. `q`
//! matches a case-insensitive substring of `name` or `description`, or an
//! exact tag. User text is escaped before it lands in a `$regex`.

use crate::config::SearchConfig;
use crate::dtos::AttractionQuery;
use mongodb::bson::{doc, Document};

/// Filter plus the clamped result cap, handed unchanged to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    pub filter: Document,
    pub limit: i64,
}

pub fn build_filter(query: &AttractionQuery, search: &SearchConfig) -> SearchFilter {
    let mut filter = Document::new();

    if let Some(category) = present(&query.category) {
        filter.insert("category", exact_ci(category));
    }

    if let Some(location) = present(&query.location) {
        filter.insert("location", exact_ci(location));
    }

    if let Some(term) = present(&query.q) {
        filter.insert(
            "$or",
            vec![
                doc! { "name": contains_ci(term) },
                doc! { "description": contains_ci(term) },
                doc! { "tags": { "$in": [term] } },
            ],
        );
    }

    SearchFilter {
        filter,
        limit: resolve_limit(query.limit, search),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn exact_ci(value: &str) -> Document {
    doc! { "$regex": format!("\\A{}\\z", regex::escape(value)), "$options": "i" }
}

fn contains_ci(value: &str) -> Document {
    doc! { "$regex": regex::escape(value), "$options": "i" }
}

fn resolve_limit(requested: Option<i64>, search: &SearchConfig) -> i64 {
    requested
        .unwrap_or(search.default_limit)
        .clamp(1, search.max_limit)
}
