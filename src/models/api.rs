//! HTTP request and response bodies of the public API

use super::coin::{CoinInfo, CoinMetadata, CoinRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// POST /api/ai body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Free-form user idea, forwarded as-is
    #[serde(default)]
    pub prompt: String,
    /// "coin" or "description"; anything else is treated as "description"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// POST /api/ai success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub result: String,
}

/// Error body shared by every route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// GET /api/coins query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    /// Restrict the feed to coins launched by this address
    #[serde(default)]
    pub creator: Option<String>,
}

/// GET /api/coins body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub coins: Vec<CoinInfo>,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/db/coins body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinListResponse {
    pub coins: Vec<CoinRecord>,
}

/// POST /api/db/coins success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSyncResponse {
    pub success: bool,
    pub data: CoinRecord,
}

/// POST /api/metadata body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    #[serde(default)]
    pub name: String,
    /// Derived from the name when blank or missing
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// POST /api/metadata success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub uri: String,
    pub metadata: CoinMetadata,
}
