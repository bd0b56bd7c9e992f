use crate::models::SearchResponse;
use crate::services::error::ServiceError;
use crate::services::linkd::{PeopleSearch, SearchParams};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Short-lived in-memory cache of search responses
///
/// Identical searches within the TTL window are answered locally, so a
/// re-submitted form does not spend another Linkd call.
pub struct CachedSearch {
    inner: Arc<dyn PeopleSearch>,
    cache: moka::future::Cache<String, SearchResponse>,
}

impl CachedSearch {
    pub fn new(inner: Arc<dyn PeopleSearch>, max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }
}

#[async_trait]
impl PeopleSearch for CachedSearch {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ServiceError> {
        let key = CacheKey::search(params);

        if let Some(hit) = self.cache.get(&key).await {
            tracing::trace!("Search cache hit: {}", key);
            return Ok(hit);
        }

        let response = self.inner.search(params).await?;
        self.cache.insert(key.clone(), response.clone()).await;
        tracing::trace!("Search cache set: {}", key);

        Ok(response)
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a search call
    pub fn search(params: &SearchParams) -> String {
        format!(
            "search:{}:{}:{}",
            params.limit,
            params.schools.join("|").to_lowercase(),
            params.query.trim().to_lowercase()
        )
    }
}
