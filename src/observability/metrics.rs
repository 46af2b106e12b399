use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()
    }).await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Request boundary
    pub token_requests: IntCounterVec,

    // Cache
    pub cache_lookups: IntCounterVec,
    pub cached_tokens: IntGauge,

    // Upstream
    pub upstream_calls: IntCounterVec,
    pub upstream_failures: IntCounterVec,
    pub upstream_duration: HistogramVec,

    // Reconciler
    pub reconcile_passes: IntCounterVec,
    pub reconcile_renewals: IntCounter,
    pub reconcile_failures: IntCounter,
    pub reconcile_duration: Histogram,

    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("steamtokenapi".into()), None)
            .expect("valid metrics prefix");

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token requests by outcome"), &["outcome"]).expect("metric"),

            cache_lookups: IntCounterVec::new(Opts::new("cache_lookups_total", "Token cache lookups by result"), &["result"]).expect("metric"),
            cached_tokens: IntGauge::new("cached_tokens", "Login tokens currently cached").expect("metric"),

            upstream_calls: IntCounterVec::new(Opts::new("upstream_calls_total", "Steam Web API calls by operation"), &["operation"]).expect("metric"),
            upstream_failures: IntCounterVec::new(Opts::new("upstream_failures_total", "Failed Steam Web API calls by operation"), &["operation"]).expect("metric"),
            upstream_duration: HistogramVec::new(HistogramOpts::new("upstream_duration_seconds", "Steam Web API call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["operation"]).expect("metric"),

            reconcile_passes: IntCounterVec::new(Opts::new("reconcile_passes_total", "Reconcile passes by result"), &["result"]).expect("metric"),
            reconcile_renewals: IntCounter::new("reconcile_renewals_total", "Expired login tokens renewed by the reconciler").expect("metric"),
            reconcile_failures: IntCounter::new("reconcile_failures_total", "Accounts the reconciler failed to renew").expect("metric"),
            reconcile_duration: Histogram::with_opts(HistogramOpts::new("reconcile_duration_seconds", "Reconcile pass duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])).expect("metric"),

            up: IntGauge::new("up", "1 if service is serving").expect("metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).expect("register metric");
        reg.register(Box::new(metrics.cache_lookups.clone())).expect("register metric");
        reg.register(Box::new(metrics.cached_tokens.clone())).expect("register metric");
        reg.register(Box::new(metrics.upstream_calls.clone())).expect("register metric");
        reg.register(Box::new(metrics.upstream_failures.clone())).expect("register metric");
        reg.register(Box::new(metrics.upstream_duration.clone())).expect("register metric");
        reg.register(Box::new(metrics.reconcile_passes.clone())).expect("register metric");
        reg.register(Box::new(metrics.reconcile_renewals.clone())).expect("register metric");
        reg.register(Box::new(metrics.reconcile_failures.clone())).expect("register metric");
        reg.register(Box::new(metrics.reconcile_duration.clone())).expect("register metric");
        reg.register(Box::new(metrics.up.clone())).expect("register metric");

        metrics
    }
}
