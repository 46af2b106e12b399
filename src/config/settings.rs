use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::helpers::time::deserialize_duration;
use crate::utils::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_METRICS_PATH,
    DEFAULT_RECONCILE_INTERVAL_SECS, REDACTED, STEAM_API_BASE_URL,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub steam: SteamConfig,
    pub auth: AuthConfig,
    pub reconcile: ReconcileConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Copy safe to log: secrets replaced
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.steam.api_key.is_empty() {
            config.steam.api_key = REDACTED.to_owned();
        }
        if !config.auth.token.is_empty() {
            config.auth.token = REDACTED.to_owned();
        }
        config
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port`; a bare `:port` binds every interface
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: DEFAULT_BIND_ADDRESS.to_owned() }
    }
}

/// ================================
/// Upstream Steam Web API
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SteamConfig {
    /// required, the service refuses to start without it
    pub api_key: String,
    pub base_url: String,
    /// per request timeout
    pub timeout_ms: u64,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: STEAM_API_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

/// Static bearer token guarding the token endpoint; empty disables the check.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub token: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReconcileConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(DEFAULT_RECONCILE_INTERVAL_SECS) }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MetricsConfig {
    pub path: String,
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_METRICS_PATH.to_owned(),
            is_enabled: true,
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}
