//! Data models module
//!
//! Defines the chat completion wire format, coin data and the public API bodies

pub mod api;
pub mod coin;
pub mod openai;
