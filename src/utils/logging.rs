use clap::ValueEnum;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::settings::{LogFormat, LoggingConfig};

const FALLBACK_FILTER: &str = "info";

/// `--log-level` values accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Directive from config (`info`, `steam_token_api=debug,warn`, ...); unparsable input means `info`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(cfg: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(&cfg.level));

    let _ = match cfg.format {
        // one flat JSON object per line, no colour codes for log shippers
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_timer(UtcTime::rfc_3339())
                    .with_ansi(false),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_timer(UtcTime::rfc_3339()))
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn unparsable_level_falls_back_to_info() {
        assert_eq!(env_filter("steam_token_api=loud").max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(env_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn cli_levels_map_to_filter_directives() {
        assert_eq!(LogLevel::from_str("warn", true).unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::Warn.as_str(), "warn");
    }
}
