//! Shared constants and defaults

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 10;
pub const MAX_RECONCILE_INTERVAL_SECS: u64 = 7 * 24 * 3600;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

// Steam Web API
pub const STEAM_API_BASE_URL: &str = "https://api.steampowered.com/IGameServersService/";
pub const STEAM_API_VERSION: &str = "v1";
pub const STEAM_ERROR_HEADER: &str = "x-error_message";

pub const REDACTED: &str = "<redacted>";
