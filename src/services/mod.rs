//! Service layer module
//!
//! Contains the completion router, coin store, coin feed and metadata publisher

pub mod feed;
pub mod metadata;
pub mod router;
pub mod store;

pub use feed::CoinFeed;
pub use metadata::MetadataPublisher;
pub use router::{Completion, CompletionRequest, CompletionRouter, Intent, RouterError};
pub use store::{CoinStore, MemoryCoinStore};
