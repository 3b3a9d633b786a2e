//! Coin store
//!
//! Persistence boundary for launched coins: Supabase through its PostgREST API
//! when configured, an in-process map otherwise

use crate::config::Settings;
use crate::models::coin::CoinRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Coins table name
const COINS_TABLE: &str = "coins";

/// Storage for coin records keyed by contract address
#[async_trait]
pub trait CoinStore: Send + Sync {
    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Insert or replace the record with the same address
    async fn upsert(&self, record: CoinRecord) -> Result<CoinRecord>;

    /// Most recently created records, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<CoinRecord>>;

    /// Records launched by `creator` (address, case-insensitive), newest first
    async fn by_creator(&self, creator: &str, limit: usize) -> Result<Vec<CoinRecord>>;
}

/// Choose the store backend from settings
pub fn build_store(settings: &Settings) -> Result<Arc<dyn CoinStore>> {
    match settings.supabase_credentials() {
        Some((url, key)) => {
            info!("Using Supabase coin store at {}", url);
            let store = SupabaseCoinStore::new(url, key, Duration::from_secs(settings.request.timeout))?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("SUPABASE_URL/SUPABASE_KEY not set, coins are kept in memory only");
            Ok(Arc::new(MemoryCoinStore::new()))
        }
    }
}

/// In-memory store; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryCoinStore {
    coins: RwLock<HashMap<String, CoinRecord>>,
}

impl MemoryCoinStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoinStore for MemoryCoinStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn upsert(&self, record: CoinRecord) -> Result<CoinRecord> {
        let mut coins = self
            .coins
            .write()
            .map_err(|_| anyhow::anyhow!("coin store lock poisoned"))?;
        coins.insert(record.address.clone(), record.clone());
        Ok(record)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CoinRecord>> {
        let coins = self
            .coins
            .read()
            .map_err(|_| anyhow::anyhow!("coin store lock poisoned"))?;

        Ok(newest_first(coins.values().cloned().collect(), limit))
    }

    async fn by_creator(&self, creator: &str, limit: usize) -> Result<Vec<CoinRecord>> {
        let coins = self
            .coins
            .read()
            .map_err(|_| anyhow::anyhow!("coin store lock poisoned"))?;

        let records = coins
            .values()
            .filter(|c| c.creator.as_deref().is_some_and(|owner| owner.eq_ignore_ascii_case(creator)))
            .cloned()
            .collect();
        Ok(newest_first(records, limit))
    }
}

fn newest_first(mut records: Vec<CoinRecord>, limit: usize) -> Vec<CoinRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records.truncate(limit);
    records
}

/// Supabase store talking to PostgREST
pub struct SupabaseCoinStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseCoinStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coinforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create Supabase HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, COINS_TABLE)
    }

    /// Newest-first select with extra PostgREST filters
    async fn select(&self, filters: &[(&str, &str)], limit: usize) -> Result<Vec<CoinRecord>> {
        let limit = limit.to_string();

        let response = self
            .client
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "created_at.desc"), ("limit", limit.as_str())])
            .query(filters)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to send select request")?;

        Self::check(response, "select")
            .await?
            .json()
            .await
            .context("Failed to parse select response")
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Supabase {} failed: {} - {}", action, status, body)
    }
}

#[async_trait]
impl CoinStore for SupabaseCoinStore {
    fn backend(&self) -> &'static str {
        "supabase"
    }

    async fn upsert(&self, record: CoinRecord) -> Result<CoinRecord> {
        debug!("Upserting coin {} into Supabase", record.address);

        let response = self
            .client
            .post(self.table_url())
            .query(&[("on_conflict", "address")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&record)
            .send()
            .await
            .context("Failed to send upsert request")?;

        let rows: Vec<CoinRecord> = Self::check(response, "upsert")
            .await?
            .json()
            .await
            .context("Failed to parse upsert response")?;

        Ok(rows.into_iter().next().unwrap_or(record))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CoinRecord>> {
        self.select(&[], limit).await
    }

    async fn by_creator(&self, creator: &str, limit: usize) -> Result<Vec<CoinRecord>> {
        // ilike without wildcards is a case-insensitive equality match
        let filter = format!("ilike.{}", creator);
        self.select(&[("creator", filter.as_str())], limit).await
    }
}
