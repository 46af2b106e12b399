use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::error;

use crate::config::settings::{LogFormat, ServiceConfig};
use crate::error::ServiceError;
use crate::utils::constants::MAX_RECONCILE_INTERVAL_SECS;

/// Values given on the command line or through the environment; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
    pub interval: Option<Duration>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Build the service configuration: optional YAML file, then overrides, then validation.
pub async fn run(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<ServiceConfig> {
    let service_config = match config_path {
        Some(path) => file_to_config(path)
            .await
            .map_err(|e| anyhow!("Invalid config '{}': {}", path.display(), e))?,
        None => ServiceConfig::default(),
    };
    let service_config = apply_overrides(service_config, overrides);
    validate(&service_config)?;
    Ok(service_config)
}

/// Load config from YAML file, expanding `${VAR}` / `${VAR:default}` first
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path).await?;
    let expanded = expand_env_vars(&content)?;
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let service_config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;
    Ok(service_config)
}

fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}")?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string())
}

pub fn apply_overrides(mut config: ServiceConfig, overrides: ConfigOverrides) -> ServiceConfig {
    if let Some(bind_address) = overrides.bind_address {
        config.server.bind_address = bind_address;
    }
    if let Some(api_key) = overrides.api_key {
        config.steam.api_key = api_key;
    }
    if let Some(auth_token) = overrides.auth_token {
        config.auth.token = auth_token;
    }
    if let Some(interval) = overrides.interval {
        config.reconcile.interval = interval;
    }
    if let Some(level) = overrides.log_level {
        config.logging.level = level;
    }
    if let Some(format) = overrides.log_format {
        config.logging.format = format;
    }
    config.server.bind_address = normalize_bind_address(&config.server.bind_address);
    config
}

/// `:8080` -> `0.0.0.0:8080`
pub fn normalize_bind_address(bind_address: &str) -> String {
    let bind_address = bind_address.trim();
    match bind_address.starts_with(':') {
        true => format!("0.0.0.0{}", bind_address),
        false => bind_address.to_owned(),
    }
}

pub fn validate(config: &ServiceConfig) -> Result<(), ServiceError> {
    if config.steam.api_key.trim().is_empty() {
        return Err(ServiceError::StartupConfiguration(
            "missing steam web api key (STEAM_WEB_API_KEY)".to_owned(),
        ));
    }
    if config.reconcile.interval.is_zero() {
        return Err(ServiceError::StartupConfiguration(
            "reconcile interval must be greater than zero".to_owned(),
        ));
    }
    if config.reconcile.interval > Duration::from_secs(MAX_RECONCILE_INTERVAL_SECS) {
        return Err(ServiceError::StartupConfiguration(format!(
            "reconcile interval {:?} exceeds the {}s maximum",
            config.reconcile.interval, MAX_RECONCILE_INTERVAL_SECS
        )));
    }
    if config.steam.timeout_ms == 0 {
        return Err(ServiceError::StartupConfiguration(
            "steam timeout_ms must be greater than zero".to_owned(),
        ));
    }
    if let Err(e) = config.server.bind_address.parse::<SocketAddr>() {
        return Err(ServiceError::StartupConfiguration(format!(
            "invalid bind address '{}', expected ip:port: {}",
            config.server.bind_address, e
        )));
    }
    if config.metrics.is_enabled && !config.metrics.path.starts_with('/') {
        return Err(ServiceError::StartupConfiguration(format!(
            "metrics path '{}' must start with '/'",
            config.metrics.path
        )));
    }
    Ok(())
}
