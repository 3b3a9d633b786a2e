//! Application configuration settings
//!
//! Server, logging, chain and collaborator settings loaded from the environment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Chain the launched coins live on
    pub network: Network,
    /// Pinata (IPFS pinning) configuration
    pub pinata: PinataConfig,
    /// Supabase (coin registry) configuration
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request size in bytes
    pub max_request_size: usize,
    /// Upstream call timeout in seconds
    pub timeout: u64,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
    /// Whether CORS is enabled
    pub cors_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

/// Pinata configuration; uploads are skipped when no JWT is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinataConfig {
    pub jwt: Option<String>,
    pub api_url: String,
}

/// Supabase configuration; the in-memory store is used when either value is missing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub key: Option<String>,
}

/// Supported Base networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub const BASE_MAINNET_ID: u64 = 8453;
    pub const BASE_SEPOLIA_ID: u64 = 84532;

    /// EVM chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => Self::BASE_MAINNET_ID,
            Network::Testnet => Self::BASE_SEPOLIA_ID,
        }
    }

    /// Human readable chain name
    pub fn chain_name(&self) -> &'static str {
        match self {
            Network::Mainnet => "Base",
            Network::Testnet => "Base Sepolia",
        }
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => anyhow::bail!("Invalid network: {} (expected mainnet or testnet)", other),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            request: RequestConfig {
                max_request_size: 1_048_576,
                timeout: 20,
            },
            security: SecurityConfig {
                allowed_origins: vec!["*".to_string()],
                cors_enabled: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
            network: Network::Testnet,
            pinata: PinataConfig {
                jwt: None,
                api_url: "https://api.pinata.cloud".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                key: None,
            },
        }
    }
}

impl Settings {
    /// Create a new configuration instance
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let settings = Self {
            server: ServerConfig {
                host: get_env_or_default("SERVER_HOST", "0.0.0.0"),
                port: get_env_or_default("SERVER_PORT", "8080")
                    .parse()
                    .context("Invalid port number")?,
            },
            request: RequestConfig {
                max_request_size: get_env_or_default("MAX_REQUEST_SIZE", "1048576")
                    .parse()
                    .context("Invalid maximum request size")?,
                timeout: get_env_or_default("REQUEST_TIMEOUT", "20")
                    .parse()
                    .context("Invalid request timeout")?,
            },
            security: SecurityConfig {
                allowed_origins: get_env_or_default("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                cors_enabled: get_env_or_default("CORS_ENABLED", "true")
                    .parse()
                    .context("Invalid CORS enabled flag")?,
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
            network: get_env_or_default("NETWORK", "testnet").parse()?,
            pinata: PinataConfig {
                jwt: get_env_non_empty("PINATA_JWT"),
                api_url: get_env_or_default("PINATA_API_URL", "https://api.pinata.cloud"),
            },
            database: DatabaseConfig {
                url: get_env_non_empty("SUPABASE_URL"),
                key: get_env_non_empty("SUPABASE_KEY"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if self.request.timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        if self.request.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        if !self.pinata.api_url.starts_with("http") {
            anyhow::bail!("Invalid Pinata API URL format, should start with 'http'");
        }

        if let Some(url) = &self.database.url {
            if !url.starts_with("http") {
                anyhow::bail!("Invalid Supabase URL format, should start with 'http'");
            }
        }

        Ok(())
    }

    /// Supabase URL and key, when both are configured
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        match (&self.database.url, &self.database.key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

/// Get environment variable or default value
pub(crate) fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable, treating blank values as unset
pub(crate) fn get_env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
