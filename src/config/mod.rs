//! Configuration management module
//!
//! Server settings come from environment variables; the provider list comes
//! from a JSON file or, failing that, from the environment as well.

pub mod file;
pub mod settings;

pub use file::{AppConfig, CompletionOptions, ProviderConfig};
pub use settings::{Network, Settings};
