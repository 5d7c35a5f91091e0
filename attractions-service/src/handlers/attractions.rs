use crate::dtos::{AttractionListResponse, AttractionQuery, CreateAttractionResponse};
use crate::models::{normalize_document, normalize_id, Attraction, ATTRACTION_COLLECTION};
use crate::query::build_filter;
use crate::services::{record_attraction_created, record_search};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

fn reject(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
}

#[tracing::instrument(skip(state, payload))]
pub async fn create_attraction(
    State(state): State<AppState>,
    payload: Result<Json<Attraction>, JsonRejection>,
) -> Result<Json<CreateAttractionResponse>, AppError> {
    let Json(attraction) = payload.map_err(reject)?;
    attraction.validate()?;

    let store = state.store()?;

    let document = mongodb::bson::to_document(&attraction).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to serialize attraction: {}", e))
    })?;

    let inserted_id = store
        .insert(ATTRACTION_COLLECTION, document)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to store attraction");
            e
        })?;

    let id = normalize_id(&inserted_id);
    record_attraction_created();
    tracing::info!(attraction_id = %id, name = %attraction.name, "Attraction created");

    Ok(Json(CreateAttractionResponse { id }))
}

#[tracing::instrument(skip(state, payload))]
pub async fn search_attractions(
    State(state): State<AppState>,
    payload: Result<Json<AttractionQuery>, JsonRejection>,
) -> Result<Json<AttractionListResponse>, AppError> {
    let Json(query) = payload.map_err(reject)?;
    query.validate()?;

    let store = state.store()?;
    let search = build_filter(&query, &state.config.search);
    tracing::debug!(filter = %search.filter, limit = search.limit, "Searching attractions");

    let documents = match store
        .find(ATTRACTION_COLLECTION, search.filter, search.limit)
        .await
    {
        Ok(documents) => documents,
        Err(e) => {
            record_search("error", None);
            tracing::error!(error = %e, "Attraction search failed");
            return Err(e);
        }
    };

    let items: Vec<_> = documents.into_iter().map(normalize_document).collect();
    record_search("ok", Some(items.len()));
    tracing::info!(count = items.len(), "Attraction search complete");

    Ok(Json(AttractionListResponse { items }))
}
