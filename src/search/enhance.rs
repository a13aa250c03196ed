use std::sync::Arc;
use tracing::{debug, warn};

use super::cache::QueryCache;
use crate::analyzer::{Analyzer, EnhancedQuery};
use crate::{DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL};


/// Expands a free-text query into keywords, synonyms and related searches
/// via the analyzer. Enhancement only ever improves recall: any failure
/// degrades to treating the raw query as the single keyword.
pub struct QueryEnhancer {
    analyzer: Arc<dyn Analyzer>,
    cache: QueryCache<EnhancedQuery>,
}

impl QueryEnhancer {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self::with_cache(analyzer, DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL)
    }

    pub fn with_cache(analyzer: Arc<dyn Analyzer>, capacity: usize, ttl_secs: u64) -> Self {
        Self {
            analyzer,
            cache: QueryCache::new(capacity, ttl_secs),
        }
    }

    pub async fn enhance(&self, query: &str) -> EnhancedQuery {
        let key = QueryCache::<EnhancedQuery>::key_for(query);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Enhancement cache hit for query '{}'", query);
            return cached;
        }

        let enhanced = match self.analyzer.enhance_query(query).await {
            Ok(enhanced) => enhanced,
            Err(e) => {
                warn!("Query enhancement failed, using raw query: {}", e);
                return EnhancedQuery::raw(query);
            }
        };

        self.cache.set(&key, enhanced.clone());
        enhanced
    }

    pub fn cache_hit_rate(&self) -> f64 {
        self.cache.hit_rate()
    }
}
