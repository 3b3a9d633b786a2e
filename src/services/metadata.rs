//! Metadata publishing
//!
//! Pins token metadata JSON to IPFS through Pinata. When pinning is not
//! configured or fails, the metadata is embedded in a base64 `data:` URI,
//! which the coin contract accepts as well.

use crate::config::Settings;
use crate::models::coin::CoinMetadata;
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Content-addressed storage for JSON documents
#[async_trait]
pub trait MetadataUploader: Send + Sync {
    /// Store the document and return its URI
    async fn upload_json(&self, name: &str, document: &serde_json::Value) -> Result<String>;
}

/// Pinata JSON pinning client
pub struct PinataUploader {
    client: Client,
    api_url: String,
    jwt: String,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

impl PinataUploader {
    pub fn new(api_url: &str, jwt: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coinforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create Pinata HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            jwt: jwt.to_string(),
        })
    }
}

#[async_trait]
impl MetadataUploader for PinataUploader {
    async fn upload_json(&self, name: &str, document: &serde_json::Value) -> Result<String> {
        let url = format!("{}/pinning/pinJSONToIPFS", self.api_url);
        let body = serde_json::json!({
            "pinataContent": document,
            "pinataMetadata": { "name": name },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.jwt)
            .json(&body)
            .send()
            .await
            .context("Failed to send pin request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Pinata request failed: {} - {}", status, error_text);
        }

        let pinned: PinResponse = response.json().await.context("Failed to parse Pinata response")?;
        Ok(format!("ipfs://{}", pinned.ipfs_hash))
    }
}

/// Publishes coin metadata, preferring IPFS
pub struct MetadataPublisher {
    uploader: Option<Arc<dyn MetadataUploader>>,
}

impl MetadataPublisher {
    pub fn new(uploader: Option<Arc<dyn MetadataUploader>>) -> Self {
        Self { uploader }
    }

    /// Pinata when a JWT is configured, inline URIs otherwise
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let uploader = match &settings.pinata.jwt {
            Some(jwt) => {
                let uploader = PinataUploader::new(
                    &settings.pinata.api_url,
                    jwt,
                    Duration::from_secs(settings.request.timeout),
                )?;
                Some(Arc::new(uploader) as Arc<dyn MetadataUploader>)
            }
            None => {
                info!("PINATA_JWT not set, metadata will be published as inline data URIs");
                None
            }
        };

        Ok(Self::new(uploader))
    }

    /// URI referencing the metadata document
    pub async fn publish(&self, metadata: &CoinMetadata) -> Result<String> {
        let document = serde_json::to_value(metadata).context("Failed to serialize metadata")?;

        if let Some(uploader) = &self.uploader {
            match uploader.upload_json(&metadata.symbol, &document).await {
                Ok(uri) => {
                    debug!("Metadata for {} pinned at {}", metadata.symbol, uri);
                    return Ok(uri);
                }
                Err(e) => warn!("Metadata upload failed, using inline URI: {:#}", e),
            }
        }

        inline_metadata_uri(&document)
    }
}

/// `data:application/json;base64,...` URI embedding the document
pub fn inline_metadata_uri(document: &serde_json::Value) -> Result<String> {
    let bytes = serde_json::to_vec(document).context("Failed to serialize metadata")?;
    Ok(format!(
        "data:application/json;base64,{}",
        general_purpose::STANDARD.encode(bytes)
    ))
}
