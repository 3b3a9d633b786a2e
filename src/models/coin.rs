//! Coin data models
//!
//! Registry rows, client input, feed entries and token metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum symbol length accepted for a launch
pub const MAX_SYMBOL_LEN: usize = 10;

/// Length of a symbol derived from the coin name
pub const DERIVED_SYMBOL_LEN: usize = 5;

/// Row of the `coins` table, keyed by contract address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub address: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Coin as submitted by the launch form after the transaction is confirmed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInput {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
}

impl CoinInput {
    /// Validate the input and turn it into a registry row
    ///
    /// A blank symbol is derived from the name; symbols are stored uppercase.
    pub fn into_record(self, default_chain_id: u64, created_at: DateTime<Utc>) -> Result<CoinRecord, String> {
        let address = self.address.trim().to_string();
        if address.is_empty() {
            return Err("Token address is required".to_string());
        }

        let (name, symbol) = token_identity(&self.name, self.symbol.as_deref())?;

        Ok(CoinRecord {
            address,
            name,
            symbol,
            description: non_blank(self.description),
            image_url: non_blank(self.image_url),
            creator: non_blank(self.creator),
            chain_id: Some(self.chain_id.unwrap_or(default_chain_id)),
            created_at,
        })
    }
}

/// Trimmed name and normalized symbol shared by every launch route
///
/// A blank symbol is derived from the name; symbols are uppercased and capped
/// at `MAX_SYMBOL_LEN` characters.
pub fn token_identity(name: &str, symbol: Option<&str>) -> Result<(String, String), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Token name is required".to_string());
    }

    let symbol = match symbol.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_uppercase(),
        _ => derive_symbol(name),
    };
    if symbol.is_empty() {
        return Err("Token symbol is required".to_string());
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(format!("Symbol must be {} characters or less", MAX_SYMBOL_LEN));
    }

    Ok((name.to_string(), symbol))
}

/// Uppercase initials of the words in `name`, at most five characters
pub fn derive_symbol(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(DERIVED_SYMBOL_LEN)
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Entry of the public coin feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub total_supply: String,
    pub market_cap: String,
    pub price: String,
    #[serde(rename = "priceChange24h")]
    pub price_change_24h: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub creator_address: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<CoinRecord> for CoinInfo {
    fn from(record: CoinRecord) -> Self {
        Self {
            address: record.address,
            name: record.name,
            symbol: record.symbol,
            total_supply: "0".to_string(),
            market_cap: "0".to_string(),
            price: "0".to_string(),
            price_change_24h: 0.0,
            image_url: record.image_url,
            creator_address: record.creator.unwrap_or_default(),
            created_at: record.created_at,
            description: record.description,
        }
    }
}

/// Token metadata document referenced by the coin contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub version: String,
}

impl CoinMetadata {
    pub const VERSION: &'static str = "0.1";

    /// Build metadata, generating a placeholder image from the symbol when none is given
    pub fn new(name: &str, symbol: &str, description: &str, image_url: Option<&str>) -> Self {
        let image = match image_url.map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("https://api.dicebear.com/7.x/shapes/svg?seed={}", symbol),
        };

        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            description: description.to_string(),
            image,
            version: Self::VERSION.to_string(),
        }
    }
}
