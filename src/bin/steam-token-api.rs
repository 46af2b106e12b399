use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use steam_token_api::cache::token_cache::TokenCache;
use steam_token_api::config::loader::{self as config_loader, ConfigOverrides};
use steam_token_api::config::settings::{LogFormat, ServiceConfig};
use steam_token_api::helpers::time::parse_duration;
use steam_token_api::reconciler::reconciler::Reconciler;
use steam_token_api::resolver::token_resolver::TokenResolver;
use steam_token_api::server;
use steam_token_api::steam::{delete_all_accounts, SteamClient};
use steam_token_api::utils::logging::{self, LogLevel};
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "STEAM_WEB_API_BIND_ADDRESS")]
    bind_address: Option<String>,
    #[arg(long, env = "STEAM_WEB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,
    /// Reconcile interval, e.g. `10s`, `1m30s`
    #[arg(long, env = "BACKGROUND_PROCESSING_INTERVAL", value_parser = parse_duration)]
    interval: Option<Duration>,
    #[arg(long, env = "LOG_LEVEL", value_enum, ignore_case = true)]
    log_level: Option<LogLevel>,
    #[arg(long, env = "LOG_FORMAT", value_enum, ignore_case = true)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Serve login tokens and renew expired accounts in the background (default)
    Serve,
    /// Delete every game server account owned by the API key, then exit
    Purge,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind_address.to_owned(),
            api_key: self.api_key.to_owned(),
            auth_token: self.auth_token.to_owned(),
            interval: self.interval,
            log_level: self.log_level.map(|level| level.as_str().to_owned()),
            log_format: self.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Make preparations
    //
    // read .env, then args and env
    // -------------------------------

    if let Err(err) = dotenv::dotenv() {
        if !err.not_found() {
            return Err(anyhow!("Error loading .env file: {}", err));
        }
    }
    let args = Args::parse();

    // -------------------------------
    // 2. Load config, start logging
    // -------------------------------

    let service_config = config_loader::run(args.config.as_deref(), args.overrides()).await?;
    logging::init_logging(&service_config.logging);
    info!("Initialized configuration: {:?}", service_config.redacted());

    // -------------------------------
    // 3. Create steam client
    // -------------------------------

    let client = Arc::new(SteamClient::new(&service_config.steam)?);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(service_config, client).await,
        Command::Purge => {
            let deleted = delete_all_accounts(client.as_ref()).await?;
            info!("deleted {} accounts", deleted);
            Ok(())
        }
    }
}

async fn serve(service_config: ServiceConfig, client: Arc<SteamClient>) -> Result<()> {
    let cache = TokenCache::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // -------------------------------
    // 4. Start background reconciler
    // -------------------------------

    let reconciler = Reconciler::new(client.clone(), cache.clone(), service_config.reconcile.interval)
        .spawn(shutdown_rx.clone());

    // -------------------------------
    // 5. Stop everything on ctrl-c / SIGTERM
    // -------------------------------

    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        let _ = signal_tx.send(true);
    });

    // -------------------------------
    // 6. Start http server
    // -------------------------------

    let resolver = TokenResolver::new(client, cache);
    info!("Service starting...");
    let served = server::server::start(&service_config, resolver, shutdown_rx).await;

    let _ = shutdown_tx.send(true);
    if let Err(err) = reconciler.await {
        warn!("reconciler task ended abnormally: {}", err);
    }
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("listening for ctrl-c failed: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("listening for SIGTERM failed: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
