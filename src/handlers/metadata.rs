//! Metadata handler
//!
//! POST /api/metadata

use crate::handlers::AppState;
use crate::models::api::{MetadataRequest, MetadataResponse};
use crate::models::coin::{token_identity, CoinMetadata};
use crate::utils::error::{AppError, AppResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

/// Build token metadata and return a URI the coin contract can reference
pub async fn handle_publish(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetadataRequest>, JsonRejection>,
) -> AppResult<Json<MetadataResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let (name, symbol) = token_identity(&request.name, Some(&request.symbol)).map_err(AppError::Validation)?;

    let metadata = CoinMetadata::new(&name, &symbol, &request.description, request.image_url.as_deref());
    let uri = state
        .metadata
        .publish(&metadata)
        .await
        .map_err(|e| AppError::Internal(format!("{:#}", e)))?;

    Ok(Json(MetadataResponse { uri, metadata }))
}
