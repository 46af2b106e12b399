use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::cache_key::CacheKey;
use crate::observability::metrics::get_metrics;

/// Login token cache: (appid, memo) -> login token.
///
/// Last write wins. Entries carry no TTL; freshness is decided by whoever
/// writes (the resolver and the reconciler). Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<CacheKey, String>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Cached token for the key, if any
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or overwrite the token for the key
    pub async fn set(&self, key: CacheKey, token: String) {
        let len = {
            let mut map = self.inner.write().await;
            map.insert(key, token);
            map.len()
        };
        get_metrics().await.cached_tokens.set(len as i64);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
