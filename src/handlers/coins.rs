//! Coin registry handlers
//!
//! GET /api/coins, GET /api/db/coins, POST /api/db/coins

use crate::handlers::AppState;
use crate::models::api::{CoinListResponse, CoinSyncResponse, FeedQuery, FeedResponse};
use crate::models::coin::CoinInput;
use crate::services::feed::DEFAULT_FEED_LIMIT;
use crate::utils::error::{AppError, AppResult, ErrorContext};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Number of rows returned by the registry listing
pub const REGISTRY_LIST_LIMIT: usize = 50;

/// Public feed of recent launches, with placeholder fallback
///
/// `?creator=0x...` narrows it to one creator's coins, without the placeholder.
pub async fn list_feed(State(state): State<Arc<AppState>>, Query(query): Query<FeedQuery>) -> Json<FeedResponse> {
    let creator = query.creator.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let coins = match creator {
        Some(creator) => state.feed.created_by(creator, DEFAULT_FEED_LIMIT).await,
        None => state.feed.top(DEFAULT_FEED_LIMIT).await,
    };

    Json(FeedResponse {
        coins,
        timestamp: Utc::now(),
    })
}

/// Raw registry rows, newest first
pub async fn list_coins(State(state): State<Arc<AppState>>) -> AppResult<Json<CoinListResponse>> {
    let coins = state
        .store
        .recent(REGISTRY_LIST_LIMIT)
        .await
        .storage_context("Failed to fetch coins")?;

    Ok(Json(CoinListResponse { coins }))
}

/// Record a launched coin, replacing any row with the same address
pub async fn sync_coin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CoinInput>, JsonRejection>,
) -> AppResult<Json<CoinSyncResponse>> {
    let Json(input) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let record = input
        .into_record(state.settings.network.chain_id(), Utc::now())
        .map_err(AppError::Validation)?;

    let stored = state
        .store
        .upsert(record)
        .await
        .storage_context("Failed to sync with database")?;

    info!("Recorded coin {} ({}) in {} store", stored.symbol, stored.address, state.store.backend());

    Ok(Json(CoinSyncResponse {
        success: true,
        data: stored,
    }))
}
