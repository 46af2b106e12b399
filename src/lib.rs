//! # Steam Game Server Token Library
//!
//! Issues login tokens for Steam game server accounts, caches them in memory
//! and keeps them fresh by renewing expired accounts in the background.
//!
//! Modules:
//! - `steam` — account model, `AccountService` capability and Steam Web API client
//! - `cache` — token cache keyed by (appid, memo)
//! - `resolver` — cache → lookup → create / renew → cache
//! - `reconciler` — periodic sweep renewing expired accounts
//! - `server` — HTTP token endpoint
//! - `config` — YAML / env / CLI configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod reconciler;
pub mod resolver;
pub mod server;
pub mod steam;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::error::{ServiceError, UpstreamError};
