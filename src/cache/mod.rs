pub mod cache_key;
pub mod token_cache;
