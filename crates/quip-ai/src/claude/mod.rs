//! Anthropic Claude API client.
//!
//! Implements the `AiClient` trait for Claude models via the
//! Anthropic Messages API (`POST /v1/messages`), authenticated with an
//! API key in the `x-api-key` header.

mod api;
mod client;
mod config;

pub use client::ClaudeClient;
pub use config::ClaudeConfig;
