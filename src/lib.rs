//! coinforge
//!
//! Backend for a token launch front end: AI-generated coin names and copy
//! served through an ordered provider fallback chain, a coin registry and
//! metadata publishing

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::{AppConfig, Settings};
pub use handlers::{create_router, router_with_state, AppState};
pub use services::{CompletionRouter, Intent, RouterError};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
