//! AI text generation handler
//!
//! POST /api/ai

use crate::handlers::AppState;
use crate::models::api::{GenerateRequest, GenerateResponse};
use crate::services::{CompletionRequest, Intent};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::truncate_content;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Generate a coin name/symbol or a description for the user's idea
///
/// Responds `{ "result": ... }` on success and `{ "error": ... }` with status 500
/// on any failure, including an unreadable body. The body is parsed as JSON
/// whatever its content type.
pub async fn handle_generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Bytes, BytesRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let payload = payload.map_err(|rejection| {
        warn!("Unreadable generation request: {}", rejection.body_text());
        AppError::Internal(format!("invalid request body: {}", rejection.body_text()))
    })?;
    let body: GenerateRequest = serde_json::from_slice(&payload).map_err(|e| {
        warn!("Unreadable generation request: {}", e);
        AppError::Internal(format!("invalid request body: {}", e))
    })?;

    let intent = Intent::from_tag(body.kind.as_deref());
    debug!(
        intent = intent.as_str(),
        "Generation request: {}",
        truncate_content(&body.prompt, 100)
    );

    let request = CompletionRequest {
        prompt: body.prompt,
        intent,
    };
    let completion = state.completions.complete(&request).await?;

    Ok(Json(GenerateResponse {
        result: completion.text,
    }))
}
