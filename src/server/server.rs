use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::Router;
use tokio::sync::watch;
use tracing::info;

use crate::config::settings::{AuthConfig, MetricsConfig, ServiceConfig};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::resolver::token_resolver::TokenResolver;
use crate::server::token_handler;
use crate::steam::service::AccountService;

pub struct AppState<S> {
    pub resolver: TokenResolver<S>,
    /// empty: authorization disabled
    pub auth_token: Arc<str>,
    pub metrics_state: MetricsState,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            auth_token: self.auth_token.clone(),
            metrics_state: self.metrics_state.clone(),
        }
    }
}

impl<S: AccountService + 'static> AppState<S> {
    pub fn new(resolver: TokenResolver<S>, auth: &AuthConfig, metrics: &Metrics) -> Self {
        Self {
            resolver,
            auth_token: Arc::from(auth.token.as_str()),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }
}

/// Token route plus the metrics route when enabled.
pub fn build_router<S: AccountService + 'static>(state: AppState<S>, metrics_config: &MetricsConfig) -> Router {
    Router::new()
        .merge(token_handler::router::<S>())
        .merge(state.metrics_state.router::<S>(metrics_config))
        .with_state(state)
}

/// Serve until `shutdown` flips to true, then drain in-flight requests.
pub async fn start<S: AccountService + 'static>(
    service_config: &ServiceConfig,
    resolver: TokenResolver<S>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(resolver, &service_config.auth, metrics);
    if state.auth_token.is_empty() {
        info!("authorization disabled, no auth token configured");
    }
    let app = build_router(state, &service_config.metrics);

    let bind_addr = &service_config.server.bind_address;
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| anyhow!("binding {} failed: {}", bind_addr, e))?;
    info!("listening on {}", listener.local_addr()?);

    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await?;
    metrics.up.set(0);
    info!("server stopped");

    Ok(())
}
