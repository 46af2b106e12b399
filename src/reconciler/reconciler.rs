use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::cache::cache_key::CacheKey;
use crate::cache::token_cache::TokenCache;
use crate::error::UpstreamError;
use crate::observability::metrics::get_metrics;
use crate::steam::service::AccountService;
use crate::utils::constants::MAX_RECONCILE_INTERVAL_SECS;

static OK_MSG: &'static str = "ok";
static ABORTED_MSG: &'static str = "aborted";

/// Outcome of one sweep over the upstream account list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub listed: usize,
    pub renewed: usize,
    pub cached: usize,
    pub failed: usize,
}

/// Periodically renews expired accounts and refreshes the cache for every account.
pub struct Reconciler<S> {
    service: Arc<S>,
    cache: TokenCache,
    interval: Duration,
}

impl<S: AccountService + 'static> Reconciler<S> {
    pub fn new(service: Arc<S>, cache: TokenCache, interval: Duration) -> Self {
        let interval = interval.min(Duration::from_secs(MAX_RECONCILE_INTERVAL_SECS));
        Self { service, cache, interval }
    }

    /// Run passes every interval until `shutdown` flips to true or its sender is dropped.
    /// Passes never overlap; ticks missed during a slow pass are skipped.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("reconciler started, interval {:?}", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // errors are already logged per pass
                    let _ = self.run_pass().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("reconciler stopped");
    }

    /// One sweep: list accounts, reset expired ones, cache every token.
    /// A listing failure aborts the pass; a failed reset only skips that account.
    pub async fn run_pass(&self) -> Result<PassSummary, UpstreamError> {
        let metrics = get_metrics().await;
        let start = Instant::now();
        debug!("reconcile pass start");

        let accounts = match self.service.list_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                error!("reconcile pass aborted, listing accounts failed: {}", err);
                metrics.reconcile_passes.with_label_values(&[ABORTED_MSG]).inc();
                metrics.reconcile_duration.observe(start.elapsed().as_secs_f64());
                return Err(err);
            }
        };

        let mut summary = PassSummary { listed: accounts.len(), ..Default::default() };
        for account in accounts {
            let key = CacheKey::new(account.app_id, account.memo.as_str());
            if !account.is_expired {
                self.cache.set(key, account.login_token).await;
                summary.cached += 1;
                continue;
            }

            match self.service.reset_login_token(&account.steam_id).await {
                Ok(renewed) => {
                    info!("renewed expired login token for {}", key);
                    self.cache.set(key, renewed.login_token).await;
                    summary.renewed += 1;
                    summary.cached += 1;
                    metrics.reconcile_renewals.inc();
                }
                Err(err) => {
                    warn!("renewing account {} ({}) failed: {}", account.steam_id, key, err);
                    summary.failed += 1;
                    metrics.reconcile_failures.inc();
                }
            }
        }

        metrics.reconcile_passes.with_label_values(&[OK_MSG]).inc();
        metrics.reconcile_duration.observe(start.elapsed().as_secs_f64());
        info!(
            "reconcile pass done: listed {}, renewed {}, cached {}, failed {}",
            summary.listed, summary.renewed, summary.cached, summary.failed
        );
        Ok(summary)
    }
}
