//! Business logic services for the relay server.
//!
//! This module contains the upstream client used by the relay handler.

pub mod claude_client;

pub use claude_client::ClaudeClient;
