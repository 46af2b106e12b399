use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::cache_key::CacheKey;
use crate::cache::token_cache::TokenCache;
use crate::error::UpstreamError;
use crate::observability::metrics::get_metrics;
use crate::steam::service::AccountService;

static HIT_MSG: &'static str = "hit";
static MISS_MSG: &'static str = "miss";

/// Resolves login tokens: cache first, then upstream lookup, creation or renewal.
///
/// Two concurrent first-time resolutions of the same key may both find no
/// account upstream and both create one; the last cache write wins.
pub struct TokenResolver<S> {
    service: Arc<S>,
    cache: TokenCache,
}

impl<S> Clone for TokenResolver<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<S: AccountService> TokenResolver<S> {
    pub fn new(service: Arc<S>, cache: TokenCache) -> Self {
        Self { service, cache }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub async fn resolve(&self, app_id: u32, memo: &str) -> Result<String, UpstreamError> {
        let metrics = get_metrics().await;
        let key = CacheKey::new(app_id, memo);

        if let Some(token) = self.cache.get(&key).await {
            metrics.cache_lookups.with_label_values(&[HIT_MSG]).inc();
            info!("serving cached login token for appid {} with memo '{}'", app_id, memo);
            return Ok(token);
        }
        metrics.cache_lookups.with_label_values(&[MISS_MSG]).inc();

        let accounts = self.service.list_accounts().await?;
        let existing = accounts.into_iter().find(|account| account.matches(app_id, memo));

        let account = match existing {
            None => {
                info!("no account for appid {} with memo '{}', creating one", app_id, memo);
                self.service.create_account(app_id, memo).await?
            }
            Some(account) if account.is_expired => {
                info!("login token of account {} expired, resetting", account.steam_id);
                self.service.reset_login_token(&account.steam_id).await?
            }
            Some(account) => {
                debug!("reusing login token of account {}", account.steam_id);
                account
            }
        };

        self.cache.set(key, account.login_token.clone()).await;
        info!("resolved login token for appid {} with memo '{}'", app_id, memo);
        Ok(account.login_token)
    }
}
